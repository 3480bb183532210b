//! Authentication and authorization module.
//!
//! Provides:
//! - Stateless JWT token creation and verification (HS256)
//! - Cookie helpers for browser clients (`jwt` httpOnly cookie)
//! - Authentication and admin-gate middleware for protected routes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware, require_admin};
//! use core_config::FromEnv;
//!
//! let config = JwtConfig::from_env()?;
//! let auth = JwtAuth::new(&config);
//!
//! let protected = Router::new()
//!     .route("/api/users/cart", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{AUTH_COOKIE, JwtAuth, JwtClaims};
pub use middleware::{jwt_auth_middleware, require_admin};
