//! Bearer token issuance and verification.
//!
//! Tokens are signed HS256 with a process-wide secret and carry the subject
//! username plus an absolute expiry. Nothing is persisted server-side; the
//! claims are reconstructed losslessly on decode.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default token lifetime when the config leaves it unset.
pub const DEFAULT_TTL_MINUTES: i64 = 15;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature mismatch, malformed token, elapsed expiry or missing subject.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a fixed secret and algorithm.
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: String, ttl_minutes: i64) -> Self {
        let minutes = if ttl_minutes > 0 {
            ttl_minutes
        } else {
            DEFAULT_TTL_MINUTES
        };
        Self {
            secret,
            ttl: Duration::minutes(minutes),
        }
    }

    /// Issues a token for `username` using the configured time-to-live.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(username, self.ttl)
    }

    /// Issues a token whose expiry is `now (UTC) + ttl`.
    pub fn issue_with_ttl(&self, username: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            username: username.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decodes a token, checking signature and expiry atomically, and returns
    /// the subject username. Any failure means "unauthenticated".
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims.username)
        .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> TokenService {
        TokenService::new("test-secret-key-that-is-at-least-32-chars".to_string(), 15)
    }

    #[test]
    fn test_token_round_trip() {
        let service = create_test_service();

        let token = service.issue("alice").expect("should issue token");
        assert!(!token.is_empty());

        let subject = service.verify(&token).expect("should verify token");
        assert_eq!(subject, "alice", "subject should match the issued username");
    }

    #[test]
    fn test_verify_is_idempotent() {
        let service = create_test_service();
        let token = service.issue("bob").expect("should issue token");

        for _ in 0..3 {
            let subject = service.verify(&token).expect("should verify token");
            assert_eq!(subject, "bob");
        }
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = create_test_service();

        let result = service.verify("not.a.token");
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = TokenService::new("secret-one-that-is-32-chars-long".to_string(), 15);
        let service2 = TokenService::new("secret-two-that-is-32-chars-long".to_string(), 15);

        let token = service1.issue("carol").expect("should issue");
        assert!(service2.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        let token = service
            .issue_with_ttl("dave", Duration::seconds(-1))
            .expect("should issue");
        assert!(
            matches!(service.verify(&token), Err(TokenError::Invalid(_))),
            "token past its expiry must not verify"
        );
    }

    #[test]
    fn test_zero_ttl_falls_back_to_default() {
        let service = TokenService::new("fallback-secret-that-is-32-chars".to_string(), 0);
        let token = service.issue("erin").expect("should issue");
        assert_eq!(service.verify(&token).expect("should verify"), "erin");
    }
}
