//! Authentication endpoints: register, login, logout, session check
//!
//! Sessions are stateless JWTs carried in the `jwt` httpOnly cookie; a
//! Bearer header works too for non-browser clients.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{jwt_auth_middleware, JwtAuth, JwtClaims, ValidatedJson};
use tracing::instrument;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::repository::UserRepository;
use crate::service::UserService;

/// State shared by the auth handlers
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt: JwtAuth,
    /// Mark session cookies Secure (set in production)
    pub secure_cookies: bool,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt: self.jwt.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// OpenAPI documentation for the auth endpoints
#[derive(OpenApi)]
#[openapi(
    paths(register, login, logout, auth_check),
    components(schemas(RegisterRequest, LoginRequest, AuthResponse)),
    tags(
        (name = "Auth", description = "Account registration and session endpoints")
    )
)]
pub struct AuthApiDoc;

/// Create the auth router
pub fn auth_router<R: UserRepository + 'static>(
    service: UserService<R>,
    jwt: JwtAuth,
    secure_cookies: bool,
) -> Router {
    let state = AuthState {
        service,
        jwt: jwt.clone(),
        secure_cookies,
    };

    let session = Router::new()
        .route("/authCheck", get(auth_check))
        .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(session)
        .with_state(state)
}

fn issue_cookie<R: UserRepository>(
    state: &AuthState<R>,
    user_id: uuid::Uuid,
    is_admin: bool,
) -> UserResult<String> {
    let token = state.jwt.create_token(user_id, is_admin).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        UserError::Internal("Failed to create token".to_string())
    })?;
    Ok(state.jwt.auth_cookie(&token, state.secure_cookies))
}

/// Register a new account and start a session
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = AuthResponse),
        (status = 400, description = "Validation failed or email/username taken"),
        (status = 500, description = "Internal error")
    )
)]
#[instrument(skip(state, input), fields(username = %input.username))]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.register(input).await?;
    let cookie = issue_cookie(&state, user.id, user.is_admin)?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            user_id: user.id,
            is_admin: user.is_admin,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
#[instrument(skip(state, input))]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.login(input).await?;
    let cookie = issue_cookie(&state, user.id, user.is_admin)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            user_id: user.id,
            is_admin: user.is_admin,
        }),
    ))
}

/// Log out by clearing the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
async fn logout<R: UserRepository>(
    State(state): State<AuthState<R>>,
) -> impl IntoResponse {
    let cookie = state.jwt.clear_cookie(state.secure_cookies);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({ "message": "Logged out" })),
    )
}

/// Report the identity behind the current session
#[utoipa::path(
    get,
    path = "/authCheck",
    tag = "Auth",
    responses(
        (status = 200, description = "Session is valid", body = AuthResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
async fn auth_check<R: UserRepository>(
    State(_state): State<AuthState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<AuthResponse>> {
    let user_id = claims
        .user_id()
        .map_err(|_| UserError::Unauthorized("Invalid token subject".to_string()))?;

    Ok(Json(AuthResponse {
        user_id,
        is_admin: claims.is_admin,
    }))
}
