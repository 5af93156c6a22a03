//! Request extractors for cross-cutting concerns.
//!
//! - [`auth`]: [`AuthUser`](auth::AuthUser), which validates the bearer access token
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <access_token>`
//! 2. `AuthUser` validates signature, algorithm and expiry
//! 3. Handler runs with the caller's user id
//!
//! Request ids, CORS, logging and metrics are applied as layers in
//! [`crate::router`].

pub mod auth;
