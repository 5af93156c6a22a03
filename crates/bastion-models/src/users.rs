//! User domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row of the `users` table.
///
/// Holds the password hash and live tokens, so it is never serialized and its
/// `Debug` output redacts them. Convert to [`UserResponse`] before it leaves a
/// service.
#[derive(FromRow, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub refresh_token: Option<String>,
    pub password_reset_token: Option<String>,
    pub password_reset_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_password_reset", &self.password_reset_token.is_some())
            .field("password_reset_expiry", &self.password_reset_expiry)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// The only user projection that is sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 9,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "$2b$04$abcdefghijklmnopqrstuu".to_string(),
            refresh_token: Some("a".repeat(64)),
            password_reset_token: Some("b".repeat(64)),
            password_reset_expiry: Some(now),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_response_only_carries_public_fields() {
        let json = serde_json::to_value(UserResponse::from(&user())).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(json["id"], 9);
        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["email"], "jane@example.com");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", user());
        assert!(!rendered.contains("$2b$04$"));
        assert!(!rendered.contains(&"a".repeat(64)));
        assert!(!rendered.contains(&"b".repeat(64)));
        assert!(rendered.contains("jane@example.com"));
    }

    #[test]
    fn test_is_deleted() {
        let mut user = user();
        assert!(!user.is_deleted());
        user.deleted_at = Some(Utc::now());
        assert!(user.is_deleted());
    }
}
