//! Password hashing behind the [`CredentialHasher`] seam.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::CoreError;

/// One-way credential hashing and verification.
///
/// Implementations are CPU-bound; callers run them on a blocking pool.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> Result<String, CoreError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// Fails closed: a malformed hash or an internal error verifies as
    /// `false`, never as success and never as a fault.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hashing with a cryptographically random salt.
///
/// The PHC string format is used for storage so algorithm parameters and
/// salt are embedded in the hash itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
