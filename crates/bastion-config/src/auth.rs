//! Password hashing and reset-token settings.
//!
//! - `BCRYPT_COST`: bcrypt work factor, 4..=31 (default: 12)
//! - `PASSWORD_RESET_TTL_SECS`: reset-token lifetime, 1 up to one year
//!   (default: 900 = 15 minutes)

use crate::error::ConfigError;
use crate::{check_ttl, parse_or, process_env};

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const DEFAULT_RESET_TTL_SECS: u64 = 15 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    pub password_reset_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            password_reset_ttl_secs: DEFAULT_RESET_TTL_SECS,
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bcrypt_cost = parse_or(source, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let password_reset_ttl_secs = check_ttl(
            "PASSWORD_RESET_TTL_SECS",
            parse_or(source, "PASSWORD_RESET_TTL_SECS", DEFAULT_RESET_TTL_SECS)?,
        )?;

        Ok(Self {
            bcrypt_cost,
            password_reset_ttl_secs,
        })
    }
}
