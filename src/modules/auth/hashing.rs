//! bcrypt on the blocking pool.

use anyhow::Context;

use bastion_core::{AuthError, PasswordHasher};

pub(crate) async fn hash_password(
    hasher: PasswordHasher,
    password: String,
) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("password hashing task failed")?
}

pub(crate) async fn verify_password(
    hasher: PasswordHasher,
    hashed: String,
    password: String,
) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || hasher.verify(&hashed, &password))
        .await
        .context("password verification task failed")?
}
