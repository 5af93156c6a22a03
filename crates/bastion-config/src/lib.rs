//! # Bastion Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`app`]: deployment environment and the aggregated [`AppConfig`]
//! - [`server`]: bind address
//! - [`database`]: PostgreSQL connection settings
//! - [`jwt`]: access-token signing secret and lifetimes
//! - [`auth`]: password hashing and reset-token settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: auth endpoint rate limiting
//!
//! Every struct has a `from_env()` constructor that reads the process
//! environment and a `from_source()` constructor that reads from any lookup
//! function, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use bastion_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("listening on {}", config.server.address());
//! ```

pub mod app;
pub mod auth;
pub mod cors;
pub mod database;
pub mod error;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use app::{AppConfig, Environment};
pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Upper bound for every token lifetime setting: one year.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Rejects a lifetime of zero or one longer than [`MAX_TTL_SECS`].
pub(crate) fn check_ttl(key: &'static str, secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 || secs > MAX_TTL_SECS {
        return Err(ConfigError::Invalid {
            key,
            value: secs.to_string(),
        });
    }
    Ok(secs)
}

/// Parses an optional variable, falling back to `default` when it is unset.
pub(crate) fn parse_or<T, F>(source: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match source(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value: raw })
        }
        _ => Ok(default),
    }
}

pub(crate) fn parse_flag<F>(source: &F, key: &'static str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    source(key)
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

/// Lookup function over the real process environment.
pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
