//! Password-reset token lifecycle.
//!
//! A reset token is 64 hex characters, stored on the user row together with
//! its expiry. Expiry is checked when the token is used; nothing sweeps stale
//! tokens. Completing a reset clears both fields, so a token works once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use bastion_auth::generate_opaque_token;
use bastion_core::{AuthError, PasswordHasher};
use bastion_db::UserStore;

use super::hashing::hash_password;

/// A token is usable strictly before its expiry; the expiry instant itself
/// counts as expired, as does a missing expiry.
pub fn is_reset_token_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expiry {
        Some(expiry) => now >= expiry,
        None => true,
    }
}

#[derive(Clone)]
pub struct PasswordResetFlow {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    ttl: Duration,
}

impl PasswordResetFlow {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, ttl: Duration) -> Self {
        Self { store, hasher, ttl }
    }

    /// Starts a reset for `email` and returns the token.
    ///
    /// Returns [`AuthError::UserNotFound`] for unknown emails. Callers facing
    /// clients must mask that.
    pub async fn request_reset(&self, email: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = generate_opaque_token()?;
        let expiry = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::internal("password reset expiry out of range"))?;
        self.store.set_password_reset(user.id, &token, expiry).await?;

        info!(user_id = user.id, %expiry, "password reset requested");
        Ok(token)
    }

    /// Sets a new password if `token` is live, then discards the token.
    pub async fn complete_reset(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let user = self
            .store
            .find_by_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        if is_reset_token_expired(user.password_reset_expiry, Utc::now()) {
            warn!(user_id = user.id, "expired password reset token presented");
            return Err(AuthError::ResetTokenExpired);
        }

        let password_hash = hash_password(self.hasher, new_password.to_owned()).await?;

        if !self
            .store
            .complete_password_reset(user.id, token, &password_hash)
            .await?
        {
            warn!(user_id = user.id, "password reset token consumed concurrently");
            return Err(AuthError::InvalidResetToken);
        }

        info!(user_id = user.id, "password reset completed");
        Ok(())
    }
}
