use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the cookie carrying the session token for browser clients
pub const AUTH_COOKIE: &str = "jwt";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Whether the user has admin privileges
    pub is_admin: bool,
    /// Expiration time (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl JwtClaims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Stateless JWT authentication (HS256).
///
/// Tokens carry the user id and admin flag; there is no server-side
/// session store, so logout is handled by clearing the cookie and
/// tokens simply age out at `ttl_seconds`.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    ttl_seconds: i64,
}

impl JwtAuth {
    /// Create a new auth instance from config.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let auth = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Create a signed token for the given user
    pub fn create_token(&self, user_id: Uuid, is_admin: bool) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            is_admin,
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Build the Set-Cookie value that stores `token` for browser clients.
    ///
    /// httpOnly and SameSite=Strict always; Secure only when the caller
    /// runs behind HTTPS (production).
    pub fn auth_cookie(&self, token: &str, secure: bool) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            AUTH_COOKIE, token, self.ttl_seconds
        );
        if secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Build the Set-Cookie value that clears the session cookie (logout)
    pub fn clear_cookie(&self, secure: bool) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
            AUTH_COOKIE
        );
        if secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("a-test-secret-that-is-long-enough-123"))
    }

    #[test]
    fn test_create_and_verify_token() {
        let auth = test_auth();
        let user_id = Uuid::now_v7();

        let token = auth.create_token(user_id, false).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(!claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_admin_flag_round_trips() {
        let auth = test_auth();
        let token = auth.create_token(Uuid::now_v7(), true).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert!(claims.is_admin);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let auth = test_auth();
        let other = JwtAuth::new(&JwtConfig::new("a-different-secret-also-long-enough!!"));

        let token = auth.create_token(Uuid::now_v7(), false).unwrap();
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let config = JwtConfig::new("a-test-secret-that-is-long-enough-123").with_ttl(-3600);
        let auth = JwtAuth::new(&config);

        let token = auth.create_token(Uuid::now_v7(), false).unwrap();
        let err = auth.verify_token(&token).unwrap_err();
        assert_eq!(
            err.kind(),
            &jsonwebtoken::errors::ErrorKind::ExpiredSignature
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = test_auth();
        assert!(auth.verify_token("not-a-token").is_err());
    }

    #[test]
    fn test_auth_cookie_flags() {
        let auth = test_auth();
        let cookie = auth.auth_cookie("abc", false);
        assert!(cookie.starts_with("jwt=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(!cookie.contains("Secure"));

        let secure = auth.auth_cookie("abc", true);
        assert!(secure.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let auth = test_auth();
        let cookie = auth.clear_cookie(false);
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
