//! In-memory [`UserStore`] for tests.
//!
//! Each operation takes the single mutex once and does all of its reading and
//! writing inside that critical section, which gives the same at-most-one-winner
//! behaviour as the conditional SQL updates in [`PgUserStore`](crate::PgUserStore).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bastion_models::User;

use crate::store::{NewUser, UserStore};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
}

impl Inner {
    fn live_mut(&mut self, predicate: impl Fn(&User) -> bool) -> Option<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.deleted_at.is_none() && predicate(u))
    }

    fn live(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.deleted_at.is_none() && predicate(u))
            .cloned()
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `ping` fail, simulating a lost database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of rows, including soft-deleted ones.
    pub fn len(&self) -> usize {
        self.lock().map(|inner| inner.users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw row lookup that ignores the soft-delete filter.
    pub fn snapshot(&self, user_id: i64) -> Option<User> {
        self.lock()
            .ok()?
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("memory user store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.lock()?.live(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock()?.live(|u| u.email == email))
    }

    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()?
            .live(|u| u.password_reset_token.as_deref() == Some(token)))
    }

    async fn insert_user(&self, new_user: NewUser<'_>) -> anyhow::Result<Option<User>> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Ok(None);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            name: new_user.name.to_string(),
            email: new_user.email.to_string(),
            password: new_user.password_hash.to_string(),
            refresh_token: None,
            password_reset_token: None,
            password_reset_expiry: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.users.push(user.clone());
        Ok(Some(user))
    }

    async fn set_refresh_token(&self, user_id: i64, token: &str) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        if let Some(user) = inner.live_mut(|u| u.id == user_id) {
            user.refresh_token = Some(token.to_string());
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        presented: &str,
        replacement: &str,
    ) -> anyhow::Result<Option<User>> {
        let mut inner = self.lock()?;
        let Some(user) = inner.live_mut(|u| u.refresh_token.as_deref() == Some(presented)) else {
            return Ok(None);
        };
        user.refresh_token = Some(replacement.to_string());
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn clear_refresh_token(&self, user_id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock()?;
        match inner.live_mut(|u| u.id == user_id) {
            Some(user) => {
                user.refresh_token = None;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        if let Some(user) = inner.live_mut(|u| u.id == user_id) {
            user.password_reset_token = Some(token.to_string());
            user.password_reset_expiry = Some(expiry);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn complete_password_reset(
        &self,
        user_id: i64,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<bool> {
        let mut inner = self.lock()?;
        let holder = inner.live_mut(|u| {
            u.id == user_id && u.password_reset_token.as_deref() == Some(token)
        });
        match holder {
            Some(user) => {
                user.password = password_hash.to_string();
                user.password_reset_token = None;
                user.password_reset_expiry = None;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, user_id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock()?;
        match inner.live_mut(|u| u.id == user_id) {
            Some(user) => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.refresh_token = None;
                user.password_reset_token = None;
                user.password_reset_expiry = None;
                user.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("memory user store marked unavailable"));
        }
        Ok(())
    }
}
