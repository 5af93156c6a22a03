use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_UNHEALTHY: &str = "unhealthy";

/// Health check result. `status` is `healthy` only when every check is `ok`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Dependency name to `ok` or `error`
    pub checks: BTreeMap<String, String>,
    pub uptime_seconds: u64,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }
}
