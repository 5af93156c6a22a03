//! Rate limiting configuration for the authentication endpoints.
//!
//! Auth routes are the brute-force target (login, password reset), so they get
//! a per-client token bucket keyed by IP address.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: turn the limiter on or off (default: true)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: tokens replenished per second (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: maximum tokens in the bucket (default: 5)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tower_governor::GovernorLayer;
//!
//! let config = RateLimitConfig::from_env()?;
//! if let Some(governor) = config.auth_governor_config() {
//!     auth_router = auth_router.layer(GovernorLayer::new(Arc::new(governor)));
//! }
//! ```

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::error::ConfigError;
use crate::{parse_flag, parse_or, process_env};

pub type AuthGovernorConfig =
    GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests per second a single client may sustain on auth routes.
    pub auth_per_second: u64,

    /// Requests a single client may fire back to back before being throttled.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            enabled: parse_flag(source, "RATE_LIMIT_ENABLED", defaults.enabled),
            auth_per_second: parse_or(
                source,
                "RATE_LIMIT_AUTH_PER_SECOND",
                defaults.auth_per_second,
            )?,
            auth_burst_size: parse_or(
                source,
                "RATE_LIMIT_AUTH_BURST_SIZE",
                defaults.auth_burst_size,
            )?,
        };

        if config.auth_per_second == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_AUTH_PER_SECOND",
                value: "0".to_string(),
            });
        }
        if config.auth_burst_size == 0 {
            return Err(ConfigError::Invalid {
                key: "RATE_LIMIT_AUTH_BURST_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(config)
    }

    /// A limiter that disables itself for tests and local tooling.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Interval after which one request slot is returned to the bucket.
    pub fn replenish_interval_ms(&self) -> u64 {
        (1000 / self.auth_per_second.max(1)).max(1)
    }

    /// Builds the governor config for auth routes.
    ///
    /// Returns `None` when rate limiting is disabled. Clients are keyed by
    /// `X-Forwarded-For`, `X-Real-IP`, `Forwarded` and finally the peer address,
    /// so the server must be run with `into_make_service_with_connect_info`.
    #[must_use]
    pub fn auth_governor_config(&self) -> Option<AuthGovernorConfig> {
        if !self.enabled {
            return None;
        }

        GovernorConfigBuilder::default()
            .per_millisecond(self.replenish_interval_ms())
            .burst_size(self.auth_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::source;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::from_source(&source(&[])).unwrap();
        assert_eq!(config, RateLimitConfig::default());
        assert!(config.enabled);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_replenish_interval() {
        let config = RateLimitConfig::default();
        assert_eq!(config.replenish_interval_ms(), 100);

        let fast = RateLimitConfig {
            auth_per_second: 5000,
            ..RateLimitConfig::default()
        };
        assert_eq!(fast.replenish_interval_ms(), 1);
    }

    #[test]
    fn test_disabled_has_no_governor() {
        assert!(RateLimitConfig::disabled().auth_governor_config().is_none());
        let config = RateLimitConfig::from_source(&source(&[("RATE_LIMIT_ENABLED", "false")]))
            .unwrap();
        assert!(config.auth_governor_config().is_none());
    }

    #[test]
    fn test_enabled_builds_governor() {
        assert!(RateLimitConfig::default().auth_governor_config().is_some());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let err = RateLimitConfig::from_source(&source(&[("RATE_LIMIT_AUTH_BURST_SIZE", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "RATE_LIMIT_AUTH_BURST_SIZE",
                ..
            }
        ));
    }
}
