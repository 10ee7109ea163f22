//! Password hashing using argon2
//!
//! New hashes are Argon2id PHC strings with the argon2 crate's default work
//! factor (19 MiB memory, 2 iterations, 1 lane). Rows written by the previous
//! deployment hold bcrypt hashes; those are recognised by their `$2?$` tag
//! and still verify.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. In async contexts use
//! the `_async` variants, which run on the blocking thread pool.

use super::error::CredentialError;
use once_cell::sync::Lazy;
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

const BCRYPT_TAGS: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Stand-in hash checked when a login names no known user
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("no-such-user-placeholder").ok());

/// Password hashing service
///
/// Stateless; safe to call from any number of threads at once.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String, CredentialError> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| CredentialError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Check a password against a stored hash (blocking operation)
    ///
    /// Returns `Ok(false)` on a mismatch and `Err(MalformedHash)` when the
    /// stored value is not a hash this service understands. Salt and cost
    /// are read from the stored hash itself.
    pub fn verify(password: &str, hash: &str) -> Result<bool, CredentialError> {
        if BCRYPT_TAGS.iter().any(|tag| hash.starts_with(tag)) {
            return bcrypt::verify(password, hash)
                .map_err(|e| CredentialError::MalformedHash(e.to_string()));
        }

        let parsed =
            PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(CredentialError::MalformedHash(
                "hash is missing its salt or digest".to_string(),
            ));
        }
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::MalformedHash(e.to_string())),
        }
    }

    /// Spend one Argon2 verification and report a mismatch
    ///
    /// Keeps "unknown user" as slow as "wrong password" at login.
    pub fn verify_dummy(password: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = Self::verify(password, hash);
        }
        false
    }

    /// [`Self::verify_dummy`] on the blocking thread pool
    pub async fn verify_dummy_async(password: String) -> bool {
        tokio::task::spawn_blocking(move || Self::verify_dummy(&password))
            .await
            .unwrap_or(false)
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool, CredentialError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| CredentialError::Hashing(format!("Task join error: {}", e)))?
    }
}
