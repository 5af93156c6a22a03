//! Password hashing backed by bcrypt.
//!
//! Each call to [`PasswordHasher::hash`] draws a fresh salt, so hashing the
//! same password twice yields two different strings. Verification re-hashes
//! with the salt and cost embedded in the stored value and compares in
//! constant time.

use anyhow::Context;
use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AuthError;

/// Slow, salted one-way hash for at-rest password storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// Creates a hasher with an explicit bcrypt work factor (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `plaintext`. Fails only if the bcrypt primitive fails.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let hashed = hash(plaintext, self.cost).context("failed to hash password")?;
        Ok(hashed)
    }

    /// Checks `plaintext` against a stored hash.
    ///
    /// A mismatch and an unparseable stored hash both produce
    /// [`AuthError::InvalidCredentials`].
    pub fn verify(&self, hashed: &str, plaintext: &str) -> Result<(), AuthError> {
        match verify(plaintext, hashed) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be parsed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
