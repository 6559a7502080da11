use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;
use thiserror::Error;

use crate::constants::limits::MAX_PASSWORD_BYTES;

/// Argon2 memory cost in KiB
const MEMORY_COST_KIB: u32 = 8192;

/// Argon2 iterations
const TIME_COST: u32 = 3;

const PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password exceeds {MAX_PASSWORD_BYTES} bytes")]
    PasswordTooLong,

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

fn hasher() -> Result<Argon2<'static>, CredentialError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| CredentialError::Hashing(format!("Invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a salted Argon2id PHC string.
///
/// CPU and memory heavy; async callers should run it on the blocking pool.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// The Argon2 parameters are read from the digest itself, so hashes produced
/// with older cost settings keep verifying. Malformed digests are a mismatch.
#[must_use]
pub fn verify_password(password: &str, digest: &str) -> bool {
    if password.is_empty() {
        return false;
    }

    let Ok(parsed) = PasswordHash::new(digest) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hashed once per process with the production parameters.
static DUMMY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("wboard-unknown-account").ok());

/// Runs one full verification against a throwaway digest and discards the
/// result, so rejecting an unknown username costs as much as a wrong password.
pub fn verify_dummy(password: &str) {
    if let Some(digest) = DUMMY_DIGEST.as_deref() {
        let _ = verify_password(password, digest);
    }
}
