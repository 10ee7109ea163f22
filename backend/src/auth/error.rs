//! Error types for the authentication core
//!
//! Token rejections keep their precise reason so it can be logged and
//! counted, but the HTTP layer collapses all of them into one
//! "unauthorized" answer.

use thiserror::Error;

/// Failures from hashing or checking a password
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The hasher itself failed (no randomness, bad parameters)
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    /// The stored hash could not be parsed, e.g. a corrupted record
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

/// Failures from issuing or verifying a session token
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is missing the `{0}` claim")]
    MissingClaim(&'static str),

    #[error("Token claim `{0}` is not a valid integer")]
    InvalidClaim(&'static str),

    #[error("Token has expired")]
    Expired,

    /// Signing failed; an internal fault rather than a rejection
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Stable label used in logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::MissingClaim(_) => "missing_claim",
            TokenError::InvalidClaim(_) => "invalid_claim",
            TokenError::Expired => "expired",
            TokenError::Signing(_) => "signing",
        }
    }

    /// Whether the error is a verdict on the presented token
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TokenError::Signing(_))
    }
}
