//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored in PHC string format, which embeds the salt and the
//! parameters, so the plaintext never reaches the database.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::SharedError;

/// Hash a password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, SharedError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SharedError::PasswordHash(e.to_string()))
}

/// Returns `Ok(true)` when `password` matches the stored `hash`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, SharedError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| SharedError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
