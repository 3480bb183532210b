//! Payments domain
//!
//! A thin Stripe integration: the storefront fetches the publishable key,
//! asks for a payment intent and confirms it client-side with Stripe.js.
//! Nothing is persisted here; order payment state lives with the order.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod stripe;

// Re-export commonly used types
pub use config::StripeConfig;
pub use error::{PaymentError, PaymentResult};
pub use handlers::ApiDoc;
pub use models::{CreatePaymentIntentRequest, PaymentIntentResponse, StripeKeyResponse};
pub use stripe::StripeClient;
