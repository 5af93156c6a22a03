use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::{
    AuthConfig, CorsConfig, DatabaseConfig, JwtConfig, RateLimitConfig, ServerConfig, process_env,
};

/// Deployment environment, read from `APP_ENV`.
///
/// Production hides the password-reset token from HTTP responses and switches
/// off nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: other.to_string(),
            }),
        }
    }
}

/// Everything the server binary needs, validated once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match source("APP_ENV") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Environment::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_source(source)?,
            database: DatabaseConfig::from_source(source)?,
            jwt: JwtConfig::from_source(source)?,
            auth: AuthConfig::from_source(source)?,
            cors: CorsConfig::from_source(source)?,
            rate_limit: RateLimitConfig::from_source(source)?,
        })
    }
}
