//! Refresh-token lifecycle.
//!
//! A user holds at most one refresh token. Every successful exchange replaces
//! it, so a token can be spent exactly once:
//!
//! ```text
//! NoToken --issue--> Issued --exchange--> Rotated --exchange--> Rotated ...
//!    ^                  |                    |
//!    +------revoke------+--------------------+
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use bastion_auth::{AccessTokenIssuer, generate_opaque_token};
use bastion_core::AuthError;
use bastion_db::UserStore;
use bastion_models::User;
use bastion_observability::{track_jwt_issued, track_refresh_rotation};

/// Result of a successful exchange.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub user_id: i64,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn UserStore>,
    access_tokens: Arc<AccessTokenIssuer>,
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn UserStore>, access_tokens: Arc<AccessTokenIssuer>) -> Self {
        Self {
            store,
            access_tokens,
        }
    }

    /// Generates a new refresh token for `user` and persists it, replacing
    /// whatever token the user held before.
    pub async fn issue_for_user(&self, user: &User) -> Result<String, AuthError> {
        let token = generate_opaque_token()?;
        self.store.set_refresh_token(user.id, &token).await?;
        Ok(token)
    }

    /// Spends `presented` and returns a fresh access token plus its replacement.
    ///
    /// The swap is one conditional update, so when several requests race with
    /// the same token only one of them gets a pair back.
    pub async fn exchange(&self, presented: &str) -> Result<TokenPair, AuthError> {
        if presented.is_empty() {
            track_refresh_rotation(false);
            return Err(AuthError::InvalidRefreshToken);
        }

        let replacement = generate_opaque_token()?;
        let Some(user) = self
            .store
            .rotate_refresh_token(presented, &replacement)
            .await?
        else {
            warn!("refresh token rejected");
            track_refresh_rotation(false);
            return Err(AuthError::InvalidRefreshToken);
        };

        let access_token = self.access_tokens.issue(user.id, &user.email)?;
        track_jwt_issued();
        track_refresh_rotation(true);
        info!(user_id = user.id, "refresh token rotated");

        Ok(TokenPair {
            user_id: user.id,
            access_token,
            refresh_token: replacement,
        })
    }

    /// Drops the user's refresh token. Idempotent.
    pub async fn revoke(&self, user_id: i64) -> Result<(), AuthError> {
        let cleared = self.store.clear_refresh_token(user_id).await?;
        info!(user_id, cleared, "refresh token revoked");
        Ok(())
    }
}
