//! Shared application state passed to the route composition.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloned per handler tree (inexpensive Arc clones under the hood),
/// carrying the configuration and the MongoDB handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
}
