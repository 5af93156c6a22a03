use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::error;

use bastion_db::UserStore;

use super::model::{HealthResponse, STATUS_HEALTHY, STATUS_UNHEALTHY};

#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn UserStore>,
    started_at: Instant,
}

impl HealthService {
    pub fn new(store: Arc<dyn UserStore>, started_at: Instant) -> Self {
        Self { store, started_at }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub async fn check(&self) -> HealthResponse {
        let database = match self.store.ping().await {
            Ok(()) => "ok",
            Err(err) => {
                error!(error = ?err, "health check: database ping failed");
                "error"
            }
        };

        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), database.to_string());

        let status = if checks.values().all(|v| v == "ok") {
            STATUS_HEALTHY
        } else {
            STATUS_UNHEALTHY
        };

        HealthResponse {
            status: status.to_string(),
            timestamp: Utc::now(),
            checks,
            uptime_seconds: self.uptime_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_db::MemoryUserStore;

    #[tokio::test]
    async fn test_healthy_when_store_answers() {
        let service = HealthService::new(Arc::new(MemoryUserStore::new()), Instant::now());
        let report = service.check().await;

        assert!(report.is_healthy());
        assert_eq!(report.checks["database"], "ok");
    }

    #[tokio::test]
    async fn test_unhealthy_when_store_is_down() {
        let store = Arc::new(MemoryUserStore::new());
        store.set_unavailable(true);
        let service = HealthService::new(store, Instant::now());
        let report = service.check().await;

        assert_eq!(report.status, "unhealthy");
        assert_eq!(report.checks["database"], "error");
    }
}
