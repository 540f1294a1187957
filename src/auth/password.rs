//! Password hashing.
//!
//! Passwords are only ever stored as Argon2id PHC strings; each hash carries
//! its own random salt, so hashing the same password twice yields different
//! output.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::shared::AppError;

/// Hash a password using Argon2id with a fresh salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            warn!(error = %e, "Failed to hash password");
            AppError::Internal
        })
}

/// Verify a password against a stored hash
///
/// Never fails: a mismatch and an unparsable stored hash both yield `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "Stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// A valid Argon2id hash of a throwaway secret
///
/// Checked in place of a real hash when the user does not exist, so an
/// unknown username costs the same as a wrong password.
pub fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| hash_password("no-such-user").unwrap_or_default())
}
