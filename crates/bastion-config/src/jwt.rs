//! Access-token signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET` (required): HMAC secret, at least 32 characters
//! - `JWT_ACCESS_TTL_SECS`: access-token lifetime in seconds, 1 up to one year
//!   (default: 86400 = 24 hours)

use crate::error::ConfigError;
use crate::{check_ttl, parse_or, process_env};

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 24 * 60 * 60;

/// Fragments of the example `.env` values that must never reach production.
const PLACEHOLDER_MARKERS: &[&str] = &["change-this", "your-jwt-secret", "your-secret-key"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_secs: u64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = source("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let config = Self {
            secret,
            access_token_ttl_secs: parse_or(source, "JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects short secrets and the placeholder values shipped in `.env.example`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lowered = self.secret.to_ascii_lowercase();
        let is_placeholder = PLACEHOLDER_MARKERS.iter().any(|m| lowered.contains(m));

        if is_placeholder || self.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                min_len: MIN_SECRET_LEN,
            });
        }
        check_ttl("JWT_ACCESS_TTL_SECS", self.access_token_ttl_secs)?;
        Ok(())
    }
}
