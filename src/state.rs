use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use bastion_auth::AccessTokenIssuer;
use bastion_config::{AppConfig, CorsConfig, Environment, RateLimitConfig};
use bastion_core::PasswordHasher;
use bastion_db::UserStore;
use bastion_observability::PrometheusHandle;

use crate::modules::auth::AuthService;
use crate::modules::health::HealthService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub health_service: HealthService,
    pub environment: Environment,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wires the services from validated configuration. The JWT secret is
    /// handed to the token issuer here and nowhere else.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn UserStore>,
        metrics_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let access_tokens = Arc::new(AccessTokenIssuer::new(
            &config.jwt.secret,
            ttl("JWT_ACCESS_TTL_SECS", config.jwt.access_token_ttl_secs)?,
        ));

        let auth_service = AuthService::new(
            store.clone(),
            PasswordHasher::new(config.auth.bcrypt_cost),
            access_tokens,
            ttl("PASSWORD_RESET_TTL_SECS", config.auth.password_reset_ttl_secs)?,
        )
        .context("failed to initialise auth service")?;

        Ok(Self {
            health_service: HealthService::new(store, Instant::now()),
            auth_service,
            environment: config.environment,
            cors_config: config.cors.clone(),
            rate_limit_config: config.rate_limit.clone(),
            metrics_handle,
        })
    }
}

fn ttl(key: &str, secs: u64) -> anyhow::Result<chrono::Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .with_context(|| format!("{key} out of range: {secs}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_config::{AuthConfig, DatabaseConfig, JwtConfig, ServerConfig};
    use bastion_db::MemoryUserStore;

    fn config(access_ttl: u64) -> AppConfig {
        AppConfig {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                run_migrations: false,
            },
            jwt: JwtConfig {
                secret: "state-tests-secret-key-with-32-chars".to_string(),
                access_token_ttl_secs: access_ttl,
            },
            auth: AuthConfig {
                bcrypt_cost: 4,
                ..AuthConfig::default()
            },
            cors: CorsConfig::default(),
            rate_limit: RateLimitConfig::disabled(),
        }
    }

    #[test]
    fn test_builds_from_config() {
        let state = AppState::new(&config(3600), Arc::new(MemoryUserStore::new()), None).unwrap();
        assert_eq!(state.auth_service.access_tokens().ttl().num_seconds(), 3600);
    }

    #[test]
    fn test_unrepresentable_ttl_is_rejected() {
        let result = AppState::new(&config(u64::MAX), Arc::new(MemoryUserStore::new()), None);
        assert!(result.is_err());
    }
}
