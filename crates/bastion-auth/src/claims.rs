use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// Deliberately small: the token proves who the caller is and nothing else.
/// Anything that can change (name, sessions) is read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim), the decimal form of the row id
    pub sub: String,
    /// User's email address at the time of issue
    pub email: String,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl Claims {
    /// The numeric user id, if `sub` holds one.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
