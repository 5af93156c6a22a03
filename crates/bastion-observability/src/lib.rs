//! Bastion Observability
//!
//! - Structured logging via `tracing-subscriber` (compact console or JSON,
//!   optional daily rolling files)
//! - Per-request log lines tagged with the `X-Request-ID` of the request
//! - Prometheus metrics for HTTP traffic and auth events
//!
//! At runtime the metrics side can be switched off with
//! `OBSERVABILITY_ENABLED=false`; logging is always on.
//!
//! # Examples
//!
//! ```no_run
//! use bastion_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     let metrics_handle = init_metrics()?;
//!     // ... build router, serve ...
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use metrics_exporter_prometheus::PrometheusHandle;

pub use logging::{REQUEST_ID_HEADER, init_tracing, logging_middleware};
pub use metrics::{
    init_metrics, is_observability_enabled, metrics_middleware, track_jwt_issued,
    track_password_reset, track_refresh_rotation, track_user_login_failure,
    track_user_login_success, track_user_registered,
};
