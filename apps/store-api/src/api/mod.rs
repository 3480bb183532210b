//! API route composition
//!
//! Wires the domain routers together under the public path layout the
//! storefront client expects:
//!
//! - `/api/products/...` - catalog browsing and admin product management
//! - `/api/users/...` - auth, accounts, cart, addresses, reviews, orders
//! - `/api/payments/...` - Stripe payment intents

pub mod health;

use axum::Router;
use axum_helpers::JwtAuth;
use domain_catalog::{CatalogService, MongoCatalogRepository};
use domain_orders::{MongoOrderRepository, OrderService};
use domain_payments::StripeClient;
use domain_users::{MongoUserRepository, UserService};
use mongodb::Database;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let jwt = JwtAuth::new(&state.config.jwt);
    let secure_cookies = state.config.environment.use_https();

    let catalog_service = CatalogService::new(MongoCatalogRepository::new(&state.db));
    let user_service = UserService::new(MongoUserRepository::new(&state.db));
    let order_service = OrderService::new(MongoOrderRepository::new(&state.db));
    let stripe_client = StripeClient::new(state.config.stripe.clone());

    // Reviews and orders hang off the users API so the public paths match
    // the storefront client
    let users_api =
        domain_users::auth_router(user_service.clone(), jwt.clone(), secure_cookies)
            .merge(domain_users::handlers::router(user_service, jwt.clone()))
            .merge(domain_orders::handlers::router(order_service, jwt.clone()))
            .nest(
                "/reviews",
                domain_catalog::handlers::reviews_router(catalog_service.clone(), jwt.clone()),
            );

    Router::new()
        .nest(
            "/products",
            domain_catalog::handlers::router(catalog_service, jwt),
        )
        .nest("/users", users_api)
        .nest("/payments", domain_payments::handlers::router(stripe_client))
        .merge(health::router(state.clone()))
}

/// Initialize the MongoDB indexes every domain relies on
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCatalogRepository::new(db).init_indexes().await?;
    MongoUserRepository::new(db).init_indexes().await?;
    MongoOrderRepository::new(db).init_indexes().await?;
    Ok(())
}
