//! HTTP handlers for the orders API
//!
//! Mounted under the users API so the public paths match the storefront
//! client (`/api/users/orders/...`).

use axum::{
    extract::{Query, State},
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
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    AdminOrder, AdminOrderParams, CreateOrderRequest, Order, OrderCustomer, OrderStatus,
    PaymentMethod, PaymentStatus, PurchasedItem, ShippingAddress, UpdateOrderStatusRequest,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// OpenAPI documentation for the orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        place_order,
        list_my_orders,
        get_single_order,
        request_cancellation,
        update_order_status,
        list_all_orders,
        delete_all_orders,
        clear_user_orders,
    ),
    components(
        schemas(
            Order, PurchasedItem, ShippingAddress, OrderStatus, PaymentMethod,
            PaymentStatus, CreateOrderRequest, UpdateOrderStatusRequest,
            AdminOrder, OrderCustomer
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
        (name = "Orders", description = "Checkout and order tracking endpoints")
    )
)]
pub struct ApiDoc;

/// Create the orders router.
///
/// Buyer endpoints require authentication; the management endpoints
/// additionally require an admin token.
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>, jwt: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let buyer = Router::new()
        .route("/orders", post(place_order).get(list_my_orders))
        .route("/orders/singleOrder/{id}", get(get_single_order))
        .route(
            "/orders/requestCancellation/{id}",
            put(request_cancellation),
        )
        .layer(middleware::from_fn_with_state(
            jwt.clone(),
            jwt_auth_middleware,
        ));

    let admin = Router::new()
        .route("/orders/{orderId}", put(update_order_status))
        .route("/admin/allOrders", get(list_all_orders))
        .route("/admin/deleteAllOrders", delete(delete_all_orders))
        .route("/clearOrders/{id}", put(clear_user_orders))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    buyer.merge(admin).with_state(shared_service)
}

fn caller_id(claims: &JwtClaims) -> OrderResult<uuid::Uuid> {
    claims
        .user_id()
        .map_err(|_| OrderError::Unauthorized("Invalid token subject".to_string()))
}

/// Place an order from the caller's cart
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed successfully", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn place_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateOrderRequest>,
) -> OrderResult<impl IntoResponse> {
    let user = caller_id(&claims)?;
    let order = service.checkout(user, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// The caller's orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Caller's orders", body = Vec<Order>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_my_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> OrderResult<Json<Vec<Order>>> {
    let user = caller_id(&claims)?;
    let orders = service.my_orders(user).await?;
    Ok(Json(orders))
}

/// Get one order; buyers see their own, admins see any
#[utoipa::path(
    get,
    path = "/orders/singleOrder/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_single_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    let user = caller_id(&claims)?;
    let order = service.get_order(user, claims.is_admin, id).await?;
    Ok(Json(order))
}

/// Flag the caller's order for cancellation
#[utoipa::path(
    put,
    path = "/orders/requestCancellation/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Cancellation requested", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn request_cancellation<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    let user = caller_id(&claims)?;
    let order = service.request_cancellation(user, id).await?;
    Ok(Json(order))
}

/// Set an order's status (admin)
#[utoipa::path(
    put,
    path = "/orders/{orderId}",
    tag = "Orders",
    params(
        ("orderId" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_status<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    UuidPath(id): UuidPath,
    Json(input): Json<UpdateOrderStatusRequest>,
) -> OrderResult<Json<Order>> {
    let order = service.set_status(id, &input.status).await?;
    Ok(Json(order))
}

/// All orders with buyer summaries, filtered and newest first (admin)
#[utoipa::path(
    get,
    path = "/admin/allOrders",
    tag = "Orders",
    params(AdminOrderParams),
    responses(
        (status = 200, description = "All orders", body = Vec<AdminOrder>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_all_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    Query(params): Query<AdminOrderParams>,
) -> OrderResult<Json<Vec<AdminOrder>>> {
    let orders = service.admin_orders(params).await?;
    Ok(Json(orders))
}

/// Delete every order (admin)
#[utoipa::path(
    delete,
    path = "/admin/deleteAllOrders",
    tag = "Orders",
    responses(
        (status = 200, description = "All orders deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_all_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<serde_json::Value>> {
    let deleted = service.delete_all_orders().await?;
    Ok(Json(
        json!({ "message": "All orders deleted", "deleted": deleted }),
    ))
}

/// Delete one user's orders (admin)
#[utoipa::path(
    put,
    path = "/clearOrders/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User orders cleared"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn clear_user_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<serde_json::Value>> {
    let deleted = service.clear_user_orders(id).await?;
    Ok(Json(
        json!({ "message": "Orders cleared", "deleted": deleted }),
    ))
}
