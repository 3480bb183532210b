//! Order service - checkout and order lifecycle

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    order_totals, AdminOrder, AdminOrderParams, AdminOrderQuery, CreateOrderRequest, Order,
    OrderStatus,
};
use crate::repository::OrderRepository;

/// Order service providing checkout and lifecycle operations
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    /// Create a new OrderService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Place an order from the caller's cart.
    ///
    /// Lines are priced at the current product prices; the total adds 10%
    /// tax and the flat shipping fee. Placing the order clears the cart.
    #[instrument(skip(self, input))]
    pub async fn checkout(&self, user: Uuid, input: CreateOrderRequest) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let items = self.repository.cart_snapshot(user).await?;
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let totals = order_totals(&items);
        let order = Order::new(
            user,
            items,
            input.shipping_address,
            input.payment_method,
            totals.total,
        );

        self.repository.place_order(order).await
    }

    /// The caller's orders, newest first
    #[instrument(skip(self))]
    pub async fn my_orders(&self, user: Uuid) -> OrderResult<Vec<Order>> {
        self.repository.list_for_user(user).await
    }

    /// Fetch one order; buyers see their own, admins see any
    #[instrument(skip(self))]
    pub async fn get_order(
        &self,
        caller: Uuid,
        caller_is_admin: bool,
        id: Uuid,
    ) -> OrderResult<Order> {
        let order = self
            .repository
            .get(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if order.user != caller && !caller_is_admin {
            return Err(OrderError::Forbidden(
                "You can only view your own orders".to_string(),
            ));
        }

        Ok(order)
    }

    /// Flag the caller's order for cancellation.
    ///
    /// Rejected once the order is Delivered or Cancelled.
    #[instrument(skip(self))]
    pub async fn request_cancellation(&self, caller: Uuid, id: Uuid) -> OrderResult<Order> {
        let mut order = self
            .repository
            .get(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        if order.user != caller {
            return Err(OrderError::Forbidden(
                "You can only cancel your own orders".to_string(),
            ));
        }
        if order.order_status.is_final() {
            return Err(OrderError::Validation(format!(
                "Order is already {}",
                order.order_status
            )));
        }

        order.cancellation_requested = true;
        order.updated_at = chrono::Utc::now();

        self.repository.update(order).await
    }

    /// All orders with buyer summaries, for the admin view
    #[instrument(skip(self, params))]
    pub async fn admin_orders(&self, params: AdminOrderParams) -> OrderResult<Vec<AdminOrder>> {
        let query = AdminOrderQuery::from_params(params);
        self.repository.admin_list(&query).await
    }

    /// Set an order's status (admin). Cancelling clears any pending
    /// cancellation request.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: Uuid, status: &str) -> OrderResult<Order> {
        let status: OrderStatus = status
            .trim()
            .parse()
            .map_err(|_| OrderError::Validation(format!("Invalid order status: {}", status)))?;

        let mut order = self
            .repository
            .get(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        order.order_status = status;
        if status == OrderStatus::Cancelled {
            order.cancellation_requested = false;
        }
        order.updated_at = chrono::Utc::now();

        self.repository.update(order).await
    }

    /// Delete every order (admin)
    #[instrument(skip(self))]
    pub async fn delete_all_orders(&self) -> OrderResult<u64> {
        self.repository.delete_all().await
    }

    /// Delete one user's orders (admin)
    #[instrument(skip(self))]
    pub async fn clear_user_orders(&self, user: Uuid) -> OrderResult<u64> {
        self.repository.clear_user_orders(user).await
    }
}

impl<R: OrderRepository> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, PurchasedItem, ShippingAddress};
    use crate::repository::MockOrderRepository;
    use mockall::predicate::eq;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".into(),
            phone: "555-0100".into(),
            street: "1 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip: "E1".into(),
            country: "UK".into(),
        }
    }

    fn checkout_request() -> CreateOrderRequest {
        CreateOrderRequest {
            shipping_address: address(),
            payment_method: PaymentMethod::CreditCard,
        }
    }

    fn item(price: f64, quantity: i32) -> PurchasedItem {
        PurchasedItem {
            product: Uuid::now_v7(),
            quantity,
            price_at_purchase: price,
            selected_size: "M".into(),
        }
    }

    #[tokio::test]
    async fn test_checkout_prices_cart_with_tax_and_shipping() {
        let user = Uuid::now_v7();
        let mut repo = MockOrderRepository::new();

        repo.expect_cart_snapshot()
            .with(eq(user))
            .returning(|_| Ok(vec![item(40.0, 2), item(20.0, 1)]));
        repo.expect_place_order()
            .withf(move |order| {
                order.user == user
                    && order.total_price == 111.99
                    && order.order_status == OrderStatus::Pending
                    && !order.cancellation_requested
            })
            .times(1)
            .returning(Ok);

        let service = OrderService::new(repo);
        let order = service.checkout(user, checkout_request()).await.unwrap();

        assert_eq!(order.products.len(), 2);
        assert_eq!(order.total_price, 111.99);
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let mut repo = MockOrderRepository::new();
        repo.expect_cart_snapshot().returning(|_| Ok(vec![]));
        repo.expect_place_order().times(0);

        let service = OrderService::new(repo);
        let result = service.checkout(Uuid::now_v7(), checkout_request()).await;

        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_get_order_hides_other_users_orders() {
        let owner = Uuid::now_v7();
        let order = Order::new(
            owner,
            vec![item(10.0, 1)],
            address(),
            PaymentMethod::DebitCard,
            12.99,
        );
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(order.clone())));

        let service = OrderService::new(repo);

        let stranger = service.get_order(Uuid::now_v7(), false, order_id).await;
        assert!(matches!(stranger, Err(OrderError::Forbidden(_))));

        let admin = service.get_order(Uuid::now_v7(), true, order_id).await;
        assert!(admin.is_ok());

        let owner_view = service.get_order(owner, false, order_id).await;
        assert!(owner_view.is_ok());
    }

    #[tokio::test]
    async fn test_request_cancellation_sets_flag() {
        let owner = Uuid::now_v7();
        let order = Order::new(
            owner,
            vec![item(10.0, 1)],
            address(),
            PaymentMethod::CashOnDelivery,
            12.99,
        );
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_update()
            .withf(|order| order.cancellation_requested)
            .times(1)
            .returning(Ok);

        let service = OrderService::new(repo);
        let updated = service.request_cancellation(owner, order_id).await.unwrap();
        assert!(updated.cancellation_requested);
    }

    #[tokio::test]
    async fn test_request_cancellation_rejected_once_delivered() {
        let owner = Uuid::now_v7();
        let mut order = Order::new(
            owner,
            vec![item(10.0, 1)],
            address(),
            PaymentMethod::CreditCard,
            12.99,
        );
        order.order_status = OrderStatus::Delivered;
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_update().times(0);

        let service = OrderService::new(repo);
        let result = service.request_cancellation(owner, order_id).await;

        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_status_rejects_unknown_value() {
        let repo = MockOrderRepository::new();
        let service = OrderService::new(repo);

        let result = service.set_status(Uuid::now_v7(), "Teleported").await;
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancelling_clears_cancellation_request() {
        let owner = Uuid::now_v7();
        let mut order = Order::new(
            owner,
            vec![item(10.0, 1)],
            address(),
            PaymentMethod::CreditCard,
            12.99,
        );
        order.cancellation_requested = true;
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_update()
            .withf(|order| {
                order.order_status == OrderStatus::Cancelled && !order.cancellation_requested
            })
            .times(1)
            .returning(Ok);

        let service = OrderService::new(repo);
        let updated = service.set_status(order_id, "Cancelled").await.unwrap();
        assert_eq!(updated.order_status, OrderStatus::Cancelled);
        assert!(!updated.cancellation_requested);
    }

    #[tokio::test]
    async fn test_set_status_accepts_multiword_status() {
        let order = Order::new(
            Uuid::now_v7(),
            vec![item(10.0, 1)],
            address(),
            PaymentMethod::CreditCard,
            12.99,
        );
        let order_id = order.id;

        let mut repo = MockOrderRepository::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(order.clone())));
        repo.expect_update()
            .withf(|order| order.order_status == OrderStatus::OutForDelivery)
            .times(1)
            .returning(Ok);

        let service = OrderService::new(repo);
        service
            .set_status(order_id, "Out for Delivery")
            .await
            .unwrap();
    }
}
