//! Minimal Stripe API client
//!
//! Talks to the payment intents endpoint directly over HTTPS; the
//! storefront confirms the intent client-side with the publishable key.

use serde_json::Value;
use tracing::instrument;

use crate::config::StripeConfig;
use crate::error::{PaymentError, PaymentResult};

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

/// Stripe API client
#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    publishable_key: String,
}

impl StripeClient {
    /// Create a client from Stripe credentials
    pub fn new(config: StripeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: config.secret_key,
            publishable_key: config.publishable_key,
        }
    }

    /// The publishable key handed to the storefront client
    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    /// Create a card payment intent for the given amount in cents.
    ///
    /// Returns the client secret the storefront uses to confirm the
    /// payment.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, amount: i64) -> PaymentResult<String> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("Payment intent creation failed");
            tracing::error!(status = %status, message, "Stripe rejected payment intent");
            return Err(PaymentError::Stripe(message.to_string()));
        }

        client_secret_from(&body)
    }
}

/// Pull the client secret out of a payment intent response body
fn client_secret_from(body: &Value) -> PaymentResult<String> {
    body.get("client_secret")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            PaymentError::MalformedResponse("Payment intent has no client secret".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_secret_extracted_from_intent() {
        let body = json!({
            "id": "pi_123",
            "object": "payment_intent",
            "client_secret": "pi_123_secret_456"
        });
        assert_eq!(client_secret_from(&body).unwrap(), "pi_123_secret_456");
    }

    #[test]
    fn test_missing_client_secret_is_an_error() {
        let body = json!({ "id": "pi_123" });
        let result = client_secret_from(&body);
        assert!(matches!(result, Err(PaymentError::MalformedResponse(_))));
    }

    #[test]
    fn test_client_secret_must_be_a_string() {
        let body = json!({ "client_secret": 42 });
        assert!(client_secret_from(&body).is_err());
    }
}
