use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Flat shipping fee applied to every order
pub const SHIPPING_FEE: f64 = 1.99;
/// Sales tax applied to the cart subtotal
pub const TAX_RATE: f64 = 0.10;

/// Order lifecycle status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    #[strum(serialize = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether a cancellation request still makes sense
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// How the customer pays
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    #[strum(serialize = "Debit Card")]
    DebitCard,
    #[serde(rename = "Cash on Delivery")]
    #[strum(serialize = "Cash on Delivery")]
    CashOnDelivery,
}

/// Payment state, tracked independently of the order status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// One purchased line, priced at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurchasedItem {
    /// Product id
    pub product: Uuid,
    /// Units bought
    pub quantity: i32,
    /// Unit price when the order was placed
    pub price_at_purchase: f64,
    /// Size label the customer picked
    pub selected_size: String,
}

/// Shipping destination captured on the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ShippingAddress {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub zip: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

/// Order entity - represents an order stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Buyer user id
    pub user: Uuid,
    /// Purchased lines
    pub products: Vec<PurchasedItem>,
    /// Shipping destination
    pub shipping_address: ShippingAddress,
    /// Grand total (subtotal + tax + shipping)
    pub total_price: f64,
    /// Payment method chosen at checkout
    pub payment_method: PaymentMethod,
    /// Payment state
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Lifecycle status
    #[serde(default)]
    pub order_status: OrderStatus,
    /// Buyer asked for cancellation; cleared when the order is cancelled
    #[serde(default)]
    pub cancellation_requested: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for placing an order from the caller's cart
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(nested)]
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// DTO for an admin status change.
///
/// The status arrives as a string and is parsed explicitly so an unknown
/// value yields a clean 400 instead of a deserialization error.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Raw admin listing filters
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct AdminOrderParams {
    /// Filter by order status
    pub status: Option<String>,
    /// Filter by pending cancellation requests ("true"/"false")
    #[serde(rename = "cancellationRequested")]
    pub cancellation_requested: Option<String>,
    /// Fuzzy text search term
    pub search: Option<String>,
}

/// Parsed admin listing filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminOrderQuery {
    pub status: Option<OrderStatus>,
    pub cancellation_requested: Option<bool>,
    pub search: Option<String>,
}

impl AdminOrderQuery {
    /// Parse raw admin filters leniently; malformed values are dropped
    pub fn from_params(params: AdminOrderParams) -> Self {
        Self {
            status: params
                .status
                .as_deref()
                .and_then(|v| v.trim().parse::<OrderStatus>().ok()),
            cancellation_requested: params
                .cancellation_requested
                .as_deref()
                .and_then(|v| v.trim().parse::<bool>().ok()),
            search: params.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Buyer summary joined into admin order rows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderCustomer {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// An order with its buyer summary, as listed in the admin view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    /// Buyer details, absent if the account was deleted
    pub customer: Option<OrderCustomer>,
}

/// Checkout totals derived from the cart subtotal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
}

/// Price an order: 10% tax on the subtotal plus a flat shipping fee,
/// rounded to cents
pub fn order_totals(items: &[PurchasedItem]) -> OrderTotals {
    let subtotal: f64 = items
        .iter()
        .map(|item| item.price_at_purchase * item.quantity as f64)
        .sum();
    let round2 = |v: f64| (v * 100.0).round() / 100.0;

    let subtotal = round2(subtotal);
    let tax = round2(subtotal * TAX_RATE);
    let total = round2(subtotal + tax + SHIPPING_FEE);

    OrderTotals {
        subtotal,
        tax,
        shipping: SHIPPING_FEE,
        total,
    }
}

impl Order {
    /// Create a pending order from priced cart lines
    pub fn new(
        user: Uuid,
        products: Vec<PurchasedItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        total_price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user,
            products,
            shipping_address,
            total_price,
            payment_method,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            cancellation_requested: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> PurchasedItem {
        PurchasedItem {
            product: Uuid::now_v7(),
            quantity,
            price_at_purchase: price,
            selected_size: "M".into(),
        }
    }

    #[test]
    fn test_order_totals_add_tax_and_shipping() {
        let totals = order_totals(&[item(40.0, 2), item(20.0, 1)]);
        assert_eq!(totals.subtotal, 100.0);
        assert_eq!(totals.tax, 10.0);
        assert_eq!(totals.shipping, 1.99);
        assert_eq!(totals.total, 111.99);
    }

    #[test]
    fn test_order_totals_round_to_cents() {
        let totals = order_totals(&[item(9.99, 3)]);
        assert_eq!(totals.subtotal, 29.97);
        assert_eq!(totals.tax, 3.0);
        assert_eq!(totals.total, 34.96);
    }

    #[test]
    fn test_status_serialization_uses_display_strings() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"Out for Delivery\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"Cash on Delivery\""
        );
        assert_eq!(
            "Out for Delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OutForDelivery
        );
    }

    #[test]
    fn test_final_statuses_block_cancellation() {
        assert!(OrderStatus::Delivered.is_final());
        assert!(OrderStatus::Cancelled.is_final());
        assert!(!OrderStatus::Shipped.is_final());
    }

    #[test]
    fn test_admin_query_drops_malformed_filters() {
        let query = AdminOrderQuery::from_params(AdminOrderParams {
            status: Some("Teleported".into()),
            cancellation_requested: Some("yes".into()),
            search: Some("  ".into()),
        });
        assert_eq!(query, AdminOrderQuery::default());

        let query = AdminOrderQuery::from_params(AdminOrderParams {
            status: Some("Shipped".into()),
            cancellation_requested: Some("true".into()),
            search: Some("ada".into()),
        });
        assert_eq!(query.status, Some(OrderStatus::Shipped));
        assert_eq!(query.cancellation_requested, Some(true));
        assert_eq!(query.search.as_deref(), Some("ada"));
    }
}
