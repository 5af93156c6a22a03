//! # Bastion Models
//!
//! Domain models and DTOs for the Bastion API.
//!
//! - [`users`]: the persisted [`User`] row and its public projection [`UserResponse`]
//! - [`auth`]: request and response bodies of the `/auth` endpoints
//!
//! Request DTOs derive [`validator::Validate`]; response DTOs derive
//! [`utoipa::ToSchema`] so they show up in the OpenAPI document.

pub mod auth;
pub mod users;

pub use users::{User, UserResponse};
