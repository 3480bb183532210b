use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Review not found: {0}")]
    ReviewNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            CatalogError::ReviewNotFound(id) => {
                AppError::NotFound(format!("Review {} not found", id))
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Unauthorized(msg) => AppError::Unauthorized(msg),
            CatalogError::Forbidden(msg) => AppError::Forbidden(msg),
            CatalogError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}
