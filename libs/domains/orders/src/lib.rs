//! Orders domain
//!
//! Checkout, order tracking and the admin order console, backed by MongoDB.
//!
//! Orders are placed from the buyer's cart: the repository prices the cart
//! lines against current product data, the service adds tax and the flat
//! shipping fee, and placing the order clears the cart. Status moves through
//! the usual fulfilment steps; buyers can flag an order for cancellation and
//! admins act on the flag.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use models::{
    order_totals, AdminOrder, AdminOrderParams, CreateOrderRequest, Order, OrderStatus,
    PaymentMethod, PaymentStatus, PurchasedItem, ShippingAddress, UpdateOrderStatusRequest,
};
pub use mongodb::MongoOrderRepository;
pub use repository::OrderRepository;
pub use service::OrderService;
