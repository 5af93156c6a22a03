//! Authentication module: registration, login, token refresh, password reset
//! and logout.
//!
//! - `controller`: HTTP handlers under `/auth`
//! - `service`: [`AuthService`], the orchestrator the handlers call
//! - `refresh`: [`RefreshTokenManager`], single-use refresh-token rotation
//! - `reset`: [`PasswordResetFlow`], time-limited single-use reset tokens

pub mod controller;
mod hashing;
pub mod refresh;
pub mod reset;
pub mod router;
pub mod service;

pub use refresh::{RefreshTokenManager, TokenPair};
pub use reset::{PasswordResetFlow, is_reset_token_expired};
pub use service::AuthService;
