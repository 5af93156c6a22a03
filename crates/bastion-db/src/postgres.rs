//! PostgreSQL-backed [`UserStore`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bastion_models::User;

use crate::store::{NewUser, UserStore};

const USER_COLUMNS: &str = "id, name, email, password, refresh_token, password_reset_token, \
     password_reset_expiry, created_at, updated_at, deleted_at";

const PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("failed to fetch user by id")
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("failed to fetch user by email")
    }

    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE password_reset_token = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .context("failed to fetch user by reset token")
    }

    async fn insert_user(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(new_user.name)
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(Some(user)),
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => Err(anyhow::Error::new(err).context("failed to insert user")),
        }
    }

    async fn set_refresh_token(&self, user_id: i64, token: &str) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET refresh_token = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await
        .context("failed to store refresh token")?;
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        presented: &str,
        replacement: &str,
    ) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET refresh_token = $2, updated_at = NOW() \
             WHERE refresh_token = $1 AND deleted_at IS NULL \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(presented)
            .bind(replacement)
            .fetch_optional(&self.pool)
            .await
            .context("failed to rotate refresh token")
    }

    async fn clear_refresh_token(&self, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("failed to clear refresh token")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET password_reset_token = $2, password_reset_expiry = $3, \
             updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(token)
        .bind(expiry)
        .execute(&self.pool)
        .await
        .context("failed to store password reset token")?;
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        user_id: i64,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET password = $3, password_reset_token = NULL, \
             password_reset_expiry = NULL, updated_at = NOW() \
             WHERE id = $1 AND password_reset_token = $2 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(token)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .context("failed to complete password reset")?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), refresh_token = NULL, \
             password_reset_token = NULL, password_reset_expiry = NULL, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("failed to soft delete user")?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .context("database ping timed out")?
            .context("database ping failed")?;
        Ok(())
    }
}
