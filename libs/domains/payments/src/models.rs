use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// DTO for starting a card payment
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentIntentRequest {
    /// Amount to charge, in the smallest currency unit (cents)
    #[validate(range(min = 1))]
    pub amount: i64,
}

/// Client secret the storefront uses to confirm the payment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Publishable key handed to the storefront client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StripeKeyResponse {
    pub publishable_key: String,
}
