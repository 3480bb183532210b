//! MongoDB connection management
//!
//! Configuration, connector with retry support, and health checks.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{
    MongoError, connect_from_config, connect_from_config_with_retry,
};
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export driver types used at call sites
pub use mongodb::{Client, Collection, Database};
