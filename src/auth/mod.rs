//! Token issuance/validation and password hashing.
//!
//! Tokens are HMAC-signed JWTs carrying the account id as subject and an
//! absolute expiry. Validation failures are never distinguished to callers:
//! structural, signature and expiry problems all collapse to `InvalidToken`.

use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id). Optional on the wire: a signed token without a
    /// subject is still treated as invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired credentials")]
    InvalidToken,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("JWT secret is not configured")]
    MissingSecret,
}

/// Issue a signed token for `subject_id`, expiring at now + `ttl`.
pub fn issue_token(secret: &str, subject_id: i64, ttl: Duration) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: Some(subject_id.to_string()),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate a token and return the subject account id.
///
/// No leeway window is applied: a token fails exactly at its expiry boundary.
pub fn validate_token(secret: &str, token: &str) -> Result<i64, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::InvalidToken)?;

    token_data
        .claims
        .sub
        .as_deref()
        .and_then(|sub| sub.parse::<i64>().ok())
        .ok_or(AuthError::InvalidToken)
}

/// One-way adaptive hash with a per-call random salt embedded in the digest.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, DEFAULT_COST)
}

/// Constant-time-safe comparison via bcrypt's own verify routine.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn issued_token_round_trips_subject() {
        let token = issue_token(SECRET, 42, Duration::minutes(30)).unwrap();
        assert_eq!(validate_token(SECRET, &token).unwrap(), 42);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(SECRET, 42, Duration::seconds(-60)).unwrap();
        assert!(matches!(
            validate_token(SECRET, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn token_before_expiry_is_accepted() {
        // Short but still-future TTL stays valid with zero leeway.
        let token = issue_token(SECRET, 7, Duration::seconds(30)).unwrap();
        assert_eq!(validate_token(SECRET, &token).unwrap(), 7);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 42, Duration::minutes(30)).unwrap();
        assert!(matches!(
            validate_token("other-secret", &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            validate_token(SECRET, "not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn missing_subject_claim_is_rejected() {
        // Correctly signed token, but no sub claim.
        #[derive(Serialize)]
        struct BareClaims {
            exp: i64,
            iat: i64,
        }

        let now = Utc::now();
        let claims = BareClaims {
            exp: (now + Duration::minutes(5)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_token(SECRET, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            issue_token("", 1, Duration::minutes(1)),
            Err(AuthError::MissingSecret)
        ));
    }

    #[test]
    fn password_hash_round_trip() {
        let digest = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &digest).unwrap());
        assert!(!verify_password("wrong-password", &digest).unwrap());
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
