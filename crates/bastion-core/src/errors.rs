//! Error types for the authentication core and the HTTP layer.
//!
//! [`AuthError`] is the closed set of outcomes the auth services can produce.
//! [`AppError`] is what handlers return; every `AuthError` converts into one
//! through an exhaustive match, so adding a variant forces a status decision.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Business and internal failures of the authentication core.
///
/// Messages never contain passwords or token values.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Internal signal for the forgot-password flow. Must be masked before it
    /// reaches a client.
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Invalid reset token")]
    InvalidResetToken,

    #[error("Reset token has expired")]
    ResetTokenExpired,

    /// Any access-token validation failure.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Store, hashing, entropy or signing failures, wrapped with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Shorthand for an internal error built from a static message.
    pub fn internal(message: &'static str) -> Self {
        Self::Internal(anyhow::anyhow!(message))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message.into()))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AuthError::ResetTokenExpired => StatusCode::BAD_REQUEST,
            // UserNotFound is masked by the forgot-password flow; reaching here is a bug.
            AuthError::UserNotFound => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({ "error": message }));

        (self.status, body).into_response()
    }
}
