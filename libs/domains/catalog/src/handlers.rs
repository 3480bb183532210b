//! HTTP handlers for the catalog API

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
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, FilterOptions, Gender, ListParams, Product, ProductDetail, ProductListing,
    ProductPage, ProductReview, ReviewWithAuthor, ReviewedProduct, SizeEntry, SizeType,
    UpdateProduct, UserReview, WriteReviewRequest,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_single_product,
        add_product,
        update_product,
        delete_product,
        filter_options,
        categories,
    ),
    components(
        schemas(
            Product, ProductReview, ProductListing, ProductPage, ProductDetail,
            ReviewWithAuthor, FilterOptions, CreateProduct, UpdateProduct,
            Gender, SizeType, SizeEntry
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
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the reviews API, mounted under the users API
#[derive(OpenApi)]
#[openapi(
    paths(write_review, delete_review, get_user_reviews),
    components(
        schemas(
            ProductReview, WriteReviewRequest, UserReview, ReviewedProduct
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
        (name = "Reviews", description = "Product review endpoints")
    )
)]
pub struct ReviewsApiDoc;

/// Create the products router.
///
/// Browsing endpoints are public; the mutating endpoints require an admin
/// token.
pub fn router<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
    jwt: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/getproducts", get(list_products))
        .route("/getSingleProduct/{id}", get(get_single_product))
        .route("/filters", get(filter_options))
        .route("/categories", get(categories));

    let admin = Router::new()
        .route("/addproduct", post(add_product))
        .route("/updateproduct/{id}", put(update_product))
        .route("/deleteproduct/{id}", delete(delete_product))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware));

    public.merge(admin).with_state(shared_service)
}

/// Create the reviews router; every endpoint requires authentication.
///
/// Mounted under the users API so the public paths match the storefront
/// client (`/api/users/reviews/...`).
pub fn reviews_router<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
    jwt: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/writeReview", post(write_review))
        .route("/deleteReview/{id}", delete(delete_review))
        .route("/getUserReviews", get(get_user_reviews))
        .layer(middleware::from_fn_with_state(jwt, jwt_auth_middleware))
        .with_state(shared_service)
}

fn caller_id(claims: &JwtClaims) -> CatalogResult<uuid::Uuid> {
    claims
        .user_id()
        .map_err(|_| CatalogError::Unauthorized("Invalid token subject".to_string()))
}

/// List products with filters and gender-blended pagination
#[utoipa::path(
    get,
    path = "/getproducts",
    tag = "Products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(params): Query<ListParams>,
) -> CatalogResult<Json<ProductPage>> {
    let page = service.find_products(params).await?;
    Ok(Json(page))
}

/// Get a product with its reviews and reviewer names
#[utoipa::path(
    get,
    path = "/getSingleProduct/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_single_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ProductDetail>> {
    let detail = service.get_product(id).await?;
    Ok(Json(detail))
}

/// Create a new product (admin)
#[utoipa::path(
    post,
    path = "/addproduct",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
#[utoipa::path(
    put,
    path = "/updateproduct/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product (admin)
#[utoipa::path(
    delete,
    path = "/deleteproduct/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct categories, sizes and colors for the filter sidebar
#[utoipa::path(
    get,
    path = "/filters",
    tag = "Products",
    responses(
        (status = 200, description = "Available filter values", body = FilterOptions),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn filter_options<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<FilterOptions>> {
    let options = service.filter_options().await?;
    Ok(Json(options))
}

/// Distinct product categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Products",
    responses(
        (status = 200, description = "Category list", body = Vec<String>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn categories<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<String>>> {
    let categories = service.categories().await?;
    Ok(Json(categories))
}

/// Write or rewrite the caller's review of a product
#[utoipa::path(
    post,
    path = "/reviews/writeReview",
    tag = "Reviews",
    request_body = WriteReviewRequest,
    responses(
        (status = 200, description = "Review saved", body = ProductReview),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn write_review<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<WriteReviewRequest>,
) -> CatalogResult<Json<ProductReview>> {
    let user = caller_id(&claims)?;
    let review = service.write_review(user, input).await?;
    Ok(Json(review))
}

/// Delete one of the caller's reviews
#[utoipa::path(
    delete,
    path = "/reviews/deleteReview/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_review<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> CatalogResult<impl IntoResponse> {
    let user = caller_id(&claims)?;
    service.delete_review(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The caller's reviews with product summaries, newest first
#[utoipa::path(
    get,
    path = "/reviews/getUserReviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "Caller's reviews", body = Vec<UserReview>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_reviews<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> CatalogResult<Json<Vec<UserReview>>> {
    let user = caller_id(&claims)?;
    let reviews = service.user_reviews(user).await?;
    Ok(Json(reviews))
}
