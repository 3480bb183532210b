//! HTTP handlers for accounts, cart and addresses

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_admin, JwtAuth, JwtClaims, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    AddToCartRequest, Address, AuthResponse, CartItem, CartLine, CartProduct, LoginRequest,
    RegisterRequest, RemoveCartItemQuery, SizeQuery, UpdateCartItemRequest, UpdateUserRequest,
    UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        get_user,
        update_user,
        delete_user,
        add_to_cart,
        get_cart,
        update_cart_item,
        remove_cart_item,
        add_address,
        list_addresses,
        update_address,
        delete_address,
    ),
    components(
        schemas(
            UserResponse, RegisterRequest, LoginRequest, AuthResponse,
            UpdateUserRequest, CartItem, CartLine, CartProduct, AddToCartRequest,
            UpdateCartItemRequest, Address
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Account management endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Addresses", description = "Saved address endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router (profile, cart, addresses, admin account ops).
///
/// Everything here requires a session; listing and deleting accounts require
/// an admin.
pub fn router<R: UserRepository + 'static>(service: UserService<R>, jwt: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let authed = Router::new()
        .route("/updateuser/{id}", put(update_user))
        .route("/cart", post(add_to_cart).get(get_cart).delete(remove_cart_item))
        .route("/cart/{productId}", put(update_cart_item))
        .route("/address", post(add_address).get(list_addresses))
        .route("/address/{index}", put(update_address).delete(delete_address))
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            jwt_auth_middleware,
        ));

    let admin = Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route("/deleteuser/{id}", delete(delete_user))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    authed.merge(admin).with_state(shared_service)
}

fn caller_id(claims: &JwtClaims) -> UserResult<uuid::Uuid> {
    claims
        .user_id()
        .map_err(|_| UserError::Unauthorized("Invalid token subject".to_string()))
}

/// List all accounts (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts", body = Vec<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Get an account by ID (admin)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a profile; users may update themselves, admins anyone
#[utoipa::path(
    put,
    path = "/updateuser/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> UserResult<Json<UserResponse>> {
    let caller = caller_id(&claims)?;
    let user = service
        .update_user(caller, claims.is_admin, id, input)
        .await?;
    Ok(Json(user))
}

/// Delete an account (admin)
#[utoipa::path(
    delete,
    path = "/deleteuser/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an item to the caller's cart
#[utoipa::path(
    post,
    path = "/cart",
    tag = "Cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_to_cart<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<AddToCartRequest>,
) -> UserResult<impl IntoResponse> {
    let user = caller_id(&claims)?;
    service.add_to_cart(user, input).await?;
    Ok(Json(serde_json::json!({ "message": "Item added to cart" })))
}

/// The caller's cart with product summaries
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    responses(
        (status = 200, description = "Cart contents", body = Vec<CartLine>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_cart<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<Vec<CartLine>>> {
    let user = caller_id(&claims)?;
    let cart = service.get_cart(user).await?;
    Ok(Json(cart))
}

/// Set the quantity of a cart line
#[utoipa::path(
    put,
    path = "/cart/{productId}",
    tag = "Cart",
    params(
        ("productId" = Uuid, Path, description = "Product ID"),
        SizeQuery
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_cart_item<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    Path(product_id): Path<uuid::Uuid>,
    Query(query): Query<SizeQuery>,
    ValidatedJson(input): ValidatedJson<UpdateCartItemRequest>,
) -> UserResult<impl IntoResponse> {
    let user = caller_id(&claims)?;
    service
        .update_cart_item(user, product_id, &query.size, input.quantity)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Cart updated" })))
}

/// Remove a cart line by product and size
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    params(RemoveCartItemQuery),
    responses(
        (status = 200, description = "Item removed"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_cart_item<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    Query(query): Query<RemoveCartItemQuery>,
) -> UserResult<impl IntoResponse> {
    let user = caller_id(&claims)?;
    service
        .remove_cart_item(user, query.product_id, &query.size)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Item removed from cart" })))
}

/// Save a new shipping address
#[utoipa::path(
    post,
    path = "/address",
    tag = "Addresses",
    request_body = Address,
    responses(
        (status = 200, description = "Saved addresses", body = Vec<Address>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_address<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(address): ValidatedJson<Address>,
) -> UserResult<Json<Vec<Address>>> {
    let user = caller_id(&claims)?;
    let addresses = service.add_address(user, address).await?;
    Ok(Json(addresses))
}

/// The caller's saved addresses
#[utoipa::path(
    get,
    path = "/address",
    tag = "Addresses",
    responses(
        (status = 200, description = "Saved addresses", body = Vec<Address>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_addresses<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<Vec<Address>>> {
    let user = caller_id(&claims)?;
    let addresses = service.list_addresses(user).await?;
    Ok(Json(addresses))
}

/// Replace a saved address by position
#[utoipa::path(
    put,
    path = "/address/{index}",
    tag = "Addresses",
    params(
        ("index" = usize, Path, description = "Address position")
    ),
    request_body = Address,
    responses(
        (status = 200, description = "Saved addresses", body = Vec<Address>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_address<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    Path(index): Path<usize>,
    ValidatedJson(address): ValidatedJson<Address>,
) -> UserResult<Json<Vec<Address>>> {
    let user = caller_id(&claims)?;
    let addresses = service.update_address(user, index, address).await?;
    Ok(Json(addresses))
}

/// Remove a saved address by position
#[utoipa::path(
    delete,
    path = "/address/{index}",
    tag = "Addresses",
    params(
        ("index" = usize, Path, description = "Address position")
    ),
    responses(
        (status = 200, description = "Saved addresses", body = Vec<Address>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_address<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    Path(index): Path<usize>,
) -> UserResult<Json<Vec<Address>>> {
    let user = caller_id(&claims)?;
    let addresses = service.delete_address(user, index).await?;
    Ok(Json(addresses))
}
