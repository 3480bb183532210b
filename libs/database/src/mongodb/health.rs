use mongodb::{Client, bson::doc};
use std::time::Instant;

/// Detailed health check outcome for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database answered the ping
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Check MongoDB connectivity with a ping against the admin database
pub async fn check_health(client: &Client) -> bool {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .is_ok()
}

/// Check MongoDB health with timing and error details
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&client).await;
/// if !status.healthy {
///     tracing::warn!("MongoDB unhealthy: {:?}", status.message);
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();

    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms: start.elapsed().as_millis() as u64,
        },
    }
}
