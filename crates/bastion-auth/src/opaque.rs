//! Opaque random tokens for refresh and password-reset flows.

use anyhow::Context;
use rand::RngCore;
use rand::rngs::OsRng;

use bastion_core::AuthError;

/// Entropy per token. Hex encoding doubles it to 64 characters.
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Draws [`OPAQUE_TOKEN_BYTES`] from the operating system CSPRNG and hex-encodes them.
///
/// # Errors
///
/// Returns [`AuthError::Internal`] if the OS entropy source fails. No
/// fallback generator is used.
pub fn generate_opaque_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; OPAQUE_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to read from the OS random number generator")?;
    Ok(hex::encode(bytes))
}
