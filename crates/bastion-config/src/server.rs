use crate::error::ConfigError;
use crate::{parse_or, process_env};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&process_env)
    }

    pub fn from_source<F>(source: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: source("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(source, "SERVER_PORT", 3000)?,
        })
    }

    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::source;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_source(&source(&[])).unwrap();
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_non_numeric_port() {
        let err = ServerConfig::from_source(&source(&[("SERVER_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SERVER_PORT", .. }));
    }
}
