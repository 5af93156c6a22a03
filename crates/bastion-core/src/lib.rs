//! # Bastion Core
//!
//! Foundational types shared by every other crate in the workspace:
//!
//! - [`errors`]: the closed [`AuthError`] taxonomy and the HTTP-facing [`AppError`]
//! - [`password`]: bcrypt-backed [`PasswordHasher`]
//!
//! # Example
//!
//! ```ignore
//! use bastion_core::{AppError, AuthError, PasswordHasher};
//!
//! let hasher = PasswordHasher::default();
//! let hash = hasher.hash("SecurePass123!")?;
//! hasher.verify(&hash, "SecurePass123!")?;
//!
//! let err: AppError = AuthError::InvalidCredentials.into();
//! assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
//! ```

pub mod errors;
pub mod password;

pub use errors::{AppError, AuthError};
pub use password::PasswordHasher;
