use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email already exists")]
    EmailExists,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Cart item not found")]
    CartItemNotFound,

    #[error("Address index {0} out of range")]
    AddressOutOfRange(usize),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses.
///
/// The duplicate-account and credential messages are part of the public
/// contract the storefront client matches on.
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::EmailExists => AppError::BadRequest("Email already exists".to_string()),
            UserError::UsernameExists => {
                AppError::BadRequest("Username already exists".to_string())
            }
            UserError::InvalidCredentials => {
                AppError::BadRequest("Invalid credentials".to_string())
            }
            UserError::CartItemNotFound => AppError::NotFound("Cart item not found".to_string()),
            UserError::AddressOutOfRange(index) => {
                AppError::NotFound(format!("Address {} not found", index))
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Unauthorized(msg) => AppError::Unauthorized(msg),
            UserError::Forbidden(msg) => AppError::Forbidden(msg),
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
