use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bastion_models::User;

/// Fields supplied by the caller when creating a user. `id` and timestamps
/// are assigned by the store.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Persistence operations needed by the auth services.
///
/// Lookups never return soft-deleted users and mutations never touch them.
/// Errors are infrastructure failures only; "no such row" is expressed in
/// the return type.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<User>>;

    /// Inserts a user. Returns `Ok(None)` if the email is already taken by
    /// any row, deleted or not.
    async fn insert_user(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>>;

    /// Overwrites the user's refresh token.
    async fn set_refresh_token(&self, user_id: i64, token: &str) -> anyhow::Result<()>;

    /// Replaces `presented` with `replacement` in one conditional update.
    ///
    /// Returns the updated user, or `None` when no live user currently holds
    /// `presented`. Of several concurrent calls with the same token at most
    /// one gets `Some`.
    async fn rotate_refresh_token(
        &self,
        presented: &str,
        replacement: &str,
    ) -> anyhow::Result<Option<User>>;

    /// Clears the refresh token. Returns whether a live user was updated.
    async fn clear_refresh_token(&self, user_id: i64) -> anyhow::Result<bool>;

    /// Stores a pending reset, replacing any previous one.
    async fn set_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    /// Sets the password hash and clears both reset fields, but only while the
    /// row still holds `token`. Returns whether the update happened.
    async fn complete_password_reset(
        &self,
        user_id: i64,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<bool>;

    /// Marks the user deleted and drops their live tokens.
    async fn soft_delete(&self, user_id: i64) -> anyhow::Result<bool>;

    /// Round trip to the backing store, used by the health check.
    async fn ping(&self) -> anyhow::Result<()>;
}
