use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use bastion_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer access token and provides the user id
/// it was issued for.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    user_id: i64,
}

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let user_id = state.auth_service.access_tokens().validate(token.trim())?;

        Ok(AuthUser { user_id })
    }
}
