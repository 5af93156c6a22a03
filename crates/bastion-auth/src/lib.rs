//! # Bastion Auth
//!
//! Token primitives for the Bastion API.
//!
//! - [`claims`]: the claim set carried by access tokens
//! - [`jwt`]: [`AccessTokenIssuer`], which signs and validates HS256 access tokens
//! - [`opaque`]: random, unguessable tokens used for refresh and password reset
//!
//! # Token Types
//!
//! - **Access token**: stateless JWT, validated by signature and expiry only
//! - **Refresh token**: 64 hex characters stored on the user row, single use
//! - **Password reset token**: 64 hex characters stored with an expiry, single use
//!
//! # Example
//!
//! ```ignore
//! use bastion_auth::{AccessTokenIssuer, generate_opaque_token};
//!
//! let issuer = AccessTokenIssuer::new(&jwt_config.secret, chrono::Duration::hours(24));
//! let access_token = issuer.issue(user.id, &user.email)?;
//! let user_id = issuer.validate(&access_token)?;
//!
//! let refresh_token = generate_opaque_token()?;
//! ```

pub mod claims;
pub mod jwt;
pub mod opaque;

pub use claims::Claims;
pub use jwt::AccessTokenIssuer;
pub use opaque::{OPAQUE_TOKEN_BYTES, generate_opaque_token};
