use std::sync::Arc;

use axum::{Router, routing::post};
use tower_governor::GovernorLayer;

use bastion_config::RateLimitConfig;

use crate::state::AppState;

use super::controller::{forgot_password, login, logout, refresh_token, register, reset_password};

/// Routes mounted under `/auth`, rate limited per client IP when enabled.
pub fn init_auth_router(rate_limit: &RateLimitConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/logout", post(logout));

    match rate_limit.auth_governor_config() {
        Some(governor) => router.layer(GovernorLayer::new(Arc::new(governor))),
        None => router,
    }
}
