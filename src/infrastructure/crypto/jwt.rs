//! JWT access tokens
//!
//! A token names one server-side session (`sid`); the session row, not the
//! token, decides whether access is still granted.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            issuer: "timeclock".to_string(),
        }
    }
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Session ID
    pub sid: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(
        user_id: &str,
        session_id: &str,
        email: &str,
        expires_at: DateTime<Utc>,
        config: &JwtConfig,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Create a signed token for a session
pub fn create_token(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "timeclock-test".into(),
        }
    }

    #[test]
    fn token_round_trips_session_claims() {
        let cfg = config();
        let claims = TokenClaims::new("u1", "s1", "a@b.c", Utc::now() + Duration::hours(1), &cfg);
        let token = create_token(&claims, &cfg).unwrap();
        let decoded = verify_token(&token, &cfg).unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.sid, "s1");
    }

    #[test]
    fn wrong_secret_or_issuer_is_rejected() {
        let cfg = config();
        let claims = TokenClaims::new("u1", "s1", "a@b.c", Utc::now() + Duration::hours(1), &cfg);
        let token = create_token(&claims, &cfg).unwrap();

        let other_secret = JwtConfig {
            secret: "other".into(),
            ..config()
        };
        assert!(verify_token(&token, &other_secret).is_err());

        let other_issuer = JwtConfig {
            issuer: "someone-else".into(),
            ..config()
        };
        assert!(verify_token(&token, &other_issuer).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config();
        let claims = TokenClaims::new("u1", "s1", "a@b.c", Utc::now() - Duration::hours(2), &cfg);
        let token = create_token(&claims, &cfg).unwrap();
        assert!(verify_token(&token, &cfg).is_err());
    }
}
