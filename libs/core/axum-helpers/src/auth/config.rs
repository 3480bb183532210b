//! JWT configuration loaded from the environment.

use core_config::{ConfigError, FromEnv, env_or_default, env_required};

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - must be at least 32 characters
/// - `JWT_TTL_SECS` (optional, default: 86400 = 1 day)
///
/// # Example
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// let config = JwtConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = JwtConfig::new("my-super-secret-key-that-is-at-least-32-chars");
/// ```
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// JWT signing secret (minimum 32 characters)
    pub secret: String,

    /// Token lifetime in seconds
    pub ttl_seconds: i64,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret and the default 1-day TTL.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_seconds: 86400,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let ttl_seconds = env_or_default("JWT_TTL_SECS", "86400")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "JWT_TTL_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_new_valid() {
        let secret = "this-is-a-valid-secret-with-32-chars!";
        let config = JwtConfig::new(secret);
        assert_eq!(config.secret, secret);
        assert_eq!(config.ttl_seconds, 86400);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("this-is-a-valid-secret-with-32-chars!")),
                ("JWT_TTL_SECS", None::<&str>),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, "this-is-a-valid-secret-with-32-chars!");
                assert_eq!(config.ttl_seconds, 86400);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_custom_ttl() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("this-is-a-valid-secret-with-32-chars!")),
                ("JWT_TTL_SECS", Some("3600")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.ttl_seconds, 3600);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let config = JwtConfig::from_env();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("32 characters"));
        });
    }
}
