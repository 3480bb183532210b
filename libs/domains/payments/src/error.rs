use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Stripe request failed: {0}")]
    Stripe(String),

    #[error("Unexpected Stripe response: {0}")]
    MalformedResponse(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Convert PaymentError to AppError for standardized error responses
impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(msg) => AppError::BadRequest(msg),
            PaymentError::Stripe(msg) => AppError::ServiceUnavailable(msg),
            PaymentError::MalformedResponse(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        PaymentError::Stripe(err.to_string())
    }
}
