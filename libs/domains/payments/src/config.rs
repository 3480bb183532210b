use core_config::{env_required, ConfigError, FromEnv};

/// Stripe API credentials
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret key used to authenticate server-side API calls
    pub secret_key: String,
    /// Publishable key handed to the storefront client
    pub publishable_key: String,
}

impl FromEnv for StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: env_required("STRIPE_SECRET_KEY")?,
            publishable_key: env_required("STRIPE_PUBLISHABLE_KEY")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_config_from_env() {
        temp_env::with_vars(
            [
                ("STRIPE_SECRET_KEY", Some("sk_test_123")),
                ("STRIPE_PUBLISHABLE_KEY", Some("pk_test_456")),
            ],
            || {
                let config = StripeConfig::from_env().unwrap();
                assert_eq!(config.secret_key, "sk_test_123");
                assert_eq!(config.publishable_key, "pk_test_456");
            },
        );
    }

    #[test]
    fn test_stripe_config_requires_secret_key() {
        temp_env::with_vars(
            [
                ("STRIPE_SECRET_KEY", None),
                ("STRIPE_PUBLISHABLE_KEY", Some("pk_test_456")),
            ],
            || {
                let result = StripeConfig::from_env();
                assert!(result.is_err());
                assert!(result.unwrap_err().to_string().contains("STRIPE_SECRET_KEY"));
            },
        );
    }
}
