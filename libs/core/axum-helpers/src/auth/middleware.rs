use super::jwt::{AUTH_COOKIE, JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;

/// Extract the JWT from the Authorization header or the session cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to the "jwt" cookie set at login
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == AUTH_COOKIE {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// JWT authentication middleware.
///
/// Validates tokens from the Authorization header or the `jwt` cookie and
/// inserts [`JwtClaims`] into request extensions on success.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{JwtAuth, auth::jwt_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/users/cart", get(cart_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         jwt_auth_middleware,
///     ));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No JWT found in Authorization header or cookie");
            return Err(AppError::Unauthorized(
                "Unauthorized: No token provided".to_string(),
            ));
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            tracing::debug!("JWT expired");
            return Err(AppError::Unauthorized(
                "Unauthorized: Token expired".to_string(),
            ));
        }
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(AppError::Unauthorized(
                "Unauthorized: Invalid token".to_string(),
            ));
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin-gate middleware.
///
/// Must run after [`jwt_auth_middleware`] so claims are present in
/// request extensions; rejects non-admin callers with 403.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<JwtClaims>()
        .map(|claims| claims.is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(AppError::Forbidden(
            "Access denied. Admins only.".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
