//! Allowed browser origins, read from `ALLOWED_ORIGINS` (comma separated).
//!
//! Credentials are allowed on CORS requests, so the wildcard origin `*` is
//! rejected; every origin has to be listed.

use crate::error::ConfigError;
use crate::process_env;

const DEFAULT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = source("ALLOWED_ORIGINS") else {
            return Ok(Self::default());
        };

        let allowed_origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if allowed_origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                value: raw,
            });
        }

        Ok(Self { allowed_origins })
    }
}
