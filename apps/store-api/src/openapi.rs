//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store API",
        version = "0.1.0",
        description = "E-commerce storefront REST API: catalog, accounts, cart, orders and payments",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_catalog::ApiDoc),
        (path = "/api/users", api = domain_users::AuthApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/users", api = domain_catalog::ReviewsApiDoc),
        (path = "/api/users", api = domain_orders::ApiDoc),
        (path = "/api/payments", api = domain_payments::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Reviews", description = "Product review endpoints"),
        (name = "Auth", description = "Account registration and session endpoints"),
        (name = "Users", description = "Account management endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Addresses", description = "Saved address endpoints"),
        (name = "Orders", description = "Checkout and order tracking endpoints"),
        (name = "Payments", description = "Stripe payment endpoints")
    )
)]
pub struct ApiDoc;
