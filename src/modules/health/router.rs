use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{health_check, metrics};

pub fn init_health_router(with_metrics: bool) -> Router<AppState> {
    let router = Router::new().route("/health", get(health_check));
    if with_metrics {
        router.route("/metrics", get(metrics))
    } else {
        router
    }
}
