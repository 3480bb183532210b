use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Convert OrderError to AppError for standardized error responses
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::EmptyCart => AppError::BadRequest("Cart is empty".to_string()),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Unauthorized(msg) => AppError::Unauthorized(msg),
            OrderError::Forbidden(msg) => AppError::Forbidden(msg),
            OrderError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for OrderError {
    fn from(err: mongodb::error::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}
