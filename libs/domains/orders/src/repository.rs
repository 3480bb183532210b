use async_trait::async_trait;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::{AdminOrder, AdminOrderQuery, Order, PurchasedItem};

/// Repository trait for order persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// The user's cart lines priced at current product prices
    async fn cart_snapshot(&self, user: Uuid) -> OrderResult<Vec<PurchasedItem>>;

    /// Persist a new order, clear the buyer's cart and record the order id
    /// on their account
    async fn place_order(&self, order: Order) -> OrderResult<Order>;

    /// Get an order by ID
    async fn get(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// A user's orders, newest first
    async fn list_for_user(&self, user: Uuid) -> OrderResult<Vec<Order>>;

    /// Replace an order document
    async fn update(&self, order: Order) -> OrderResult<Order>;

    /// All orders with buyer summaries, filtered and newest first
    async fn admin_list(&self, query: &AdminOrderQuery) -> OrderResult<Vec<AdminOrder>>;

    /// Delete every order and clear every user's order list.
    /// Returns the number of orders removed.
    async fn delete_all(&self) -> OrderResult<u64>;

    /// Delete one user's orders and clear their order list.
    /// Returns the number of orders removed.
    async fn clear_user_orders(&self, user: Uuid) -> OrderResult<u64>;
}
