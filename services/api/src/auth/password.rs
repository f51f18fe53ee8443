//! Credential hashing

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to hash password: {0}")]
pub struct HashError(String);

/// Hash and verify plaintext credentials
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// `false` for a wrong credential and for an unparseable digest
    fn verify(&self, digest: &str, plaintext: &str) -> bool;
}

/// Argon2id with a random salt per credential
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, digest: &str, plaintext: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Reversible stand-in so tests do not pay for Argon2
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct PlainHasher;

#[cfg(test)]
impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, digest: &str, plaintext: &str) -> bool {
        digest.strip_prefix("plain$") == Some(plaintext)
    }
}
