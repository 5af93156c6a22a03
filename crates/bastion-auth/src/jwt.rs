//! HS256 access-token issuing and validation.
//!
//! The issuer is built once at startup with the signing secret injected, then
//! shared behind an `Arc`. It never reads configuration on the hot path.
//!
//! # Validation rules
//!
//! - Only `HS256` is accepted. Tokens declaring any other algorithm, including
//!   `none` and the other HMAC variants, are rejected.
//! - `exp` is required and checked with zero leeway.
//! - `sub` must be the decimal form of a user id.
//!
//! Every failure collapses to [`AuthError::InvalidToken`] so callers cannot
//! tell a forged token from an expired one.

use std::fmt;

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use bastion_core::AuthError;

use crate::claims::Claims;

#[derive(Clone)]
pub struct AccessTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    has_secret: bool,
}

impl fmt::Debug for AccessTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenIssuer")
            .field("ttl_secs", &self.ttl.num_seconds())
            .field("has_secret", &self.has_secret)
            .finish_non_exhaustive()
    }
}

impl AccessTokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            has_secret: !secret.is_empty(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signs an access token for `user_id`, valid from now for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] when no secret is configured, the expiry
    /// does not fit in a timestamp, or the signing primitive fails.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        if !self.has_secret {
            return Err(AuthError::internal("JWT secret not configured"));
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::internal("access token expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to sign access token")?;
        Ok(token)
    }

    /// Verifies signature, algorithm and expiry and returns the full claim set.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        if !self.has_secret {
            return Err(AuthError::InvalidToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = %e, "access token rejected");
                AuthError::InvalidToken
            })?;

        if claims.user_id().is_none() {
            tracing::debug!("access token rejected: non-numeric subject");
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Like [`decode`](Self::decode) but returns only the user id.
    pub fn validate(&self, token: &str) -> Result<i64, AuthError> {
        self.decode(token)?
            .user_id()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    /// `{"alg":"none","typ":"JWT"}` / `{"sub":"1","email":"user@example.com","iat":1700000000,"exp":4102444800}`
    const UNSIGNED_TOKEN: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiIxIiwiZW1haWwiOiJ1c2VyQGV4YW1wbGUuY29tIiwiaWF0IjoxNzAwMDAwMDAwLCJleHAiOjQxMDI0NDQ4MDB9.";

    fn issuer() -> AccessTokenIssuer {
        AccessTokenIssuer::new(SECRET, Duration::hours(24))
    }

    fn sign(claims: &Claims, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_for(sub: &str, exp: i64) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "user@example.com".to_string(),
            iat: Utc::now().timestamp(),
            exp,
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = issuer();
        let token = issuer.issue(42, "user@example.com").unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), 42);
    }

    #[test]
    fn test_decode_returns_claims() {
        let issuer = issuer();
        let token = issuer.issue(7, "seven@example.com").unwrap();
        let claims = issuer.decode(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "seven@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_custom_ttl_is_applied() {
        let issuer = AccessTokenIssuer::new(SECRET, Duration::minutes(15));
        let claims = issuer.decode(&issuer.issue(1, "a@example.com").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issuer().issue(1, "user@example.com").unwrap();
        let other = AccessTokenIssuer::new("another-secret-key-that-is-32-chars-long", Duration::hours(1));
        assert!(matches!(other.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_other_hmac_algorithm_is_rejected() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(&claims_for("1", exp), Algorithm::HS512, SECRET);
        assert!(matches!(issuer().validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        assert!(matches!(
            issuer().validate(UNSIGNED_TOKEN),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected_without_leeway() {
        let exp = Utc::now().timestamp() - 5;
        let token = sign(&claims_for("1", exp), Algorithm::HS256, SECRET);
        assert!(matches!(issuer().validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(&claims_for("admin", exp), Algorithm::HS256, SECRET);
        assert!(matches!(issuer().validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let issuer = issuer();
        assert!(matches!(issuer.validate(""), Err(AuthError::InvalidToken)));
        assert!(matches!(issuer.validate("not.a.jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue(1, "user@example.com").unwrap();
        let other = issuer.issue(2, "other@example.com").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(issuer.validate(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_cannot_issue() {
        let issuer = AccessTokenIssuer::new("", Duration::hours(1));
        let err = issuer.issue(1, "user@example.com").unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "JWT secret not configured");
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let issuer = AccessTokenIssuer::new(SECRET, Duration::seconds(10_000_000_000_000));
        let err = issuer.issue(1, "user@example.com").unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "access token expiry out of range");
    }

    #[test]
    fn test_one_year_ttl_issues() {
        let issuer = AccessTokenIssuer::new(SECRET, Duration::days(365));
        let claims = issuer.decode(&issuer.issue(1, "a@example.com").unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 365 * 24 * 60 * 60);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let rendered = format!("{:?}", issuer());
        assert!(!rendered.contains(SECRET));
    }
}
