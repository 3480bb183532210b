//! HTTP handlers for the payments API

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
    },
    ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::PaymentResult;
use crate::models::{CreatePaymentIntentRequest, PaymentIntentResponse, StripeKeyResponse};
use crate::stripe::StripeClient;

/// OpenAPI documentation for the payments API
#[derive(OpenApi)]
#[openapi(
    paths(get_stripe_key, create_payment_intent),
    components(
        schemas(CreatePaymentIntentRequest, PaymentIntentResponse, StripeKeyResponse),
        responses(
            BadRequestValidationResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Payments", description = "Stripe payment endpoints")
    )
)]
pub struct ApiDoc;

/// Create the payments router
pub fn router(client: StripeClient) -> Router {
    Router::new()
        .route("/stripe-key", get(get_stripe_key))
        .route("/create-payment-intent", post(create_payment_intent))
        .with_state(Arc::new(client))
}

/// The publishable key the storefront initializes Stripe.js with
#[utoipa::path(
    get,
    path = "/stripe-key",
    tag = "Payments",
    responses(
        (status = 200, description = "Publishable key", body = StripeKeyResponse)
    )
)]
async fn get_stripe_key(
    State(client): State<Arc<StripeClient>>,
) -> PaymentResult<Json<StripeKeyResponse>> {
    Ok(Json(StripeKeyResponse {
        publishable_key: client.publishable_key().to_string(),
    }))
}

/// Create a card payment intent for the given amount in cents
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent created", body = PaymentIntentResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_payment_intent(
    State(client): State<Arc<StripeClient>>,
    ValidatedJson(input): ValidatedJson<CreatePaymentIntentRequest>,
) -> PaymentResult<Json<PaymentIntentResponse>> {
    let client_secret = client.create_payment_intent(input.amount).await?;
    Ok(Json(PaymentIntentResponse { client_secret }))
}
