//! Server secret loading
//!
//! The secret signs every session token for the lifetime of the process.
//! It is read once at startup and kept behind `secrecy` so it never ends up
//! in logs or debug output.

use super::ConfigError;
use secrecy::{ExposeSecret, SecretVec};
use std::fmt;
use std::path::Path;

/// Process-wide token signing secret
pub struct ServerSecret(SecretVec<u8>);

impl ServerSecret {
    /// Read the secret from a file, byte for byte
    ///
    /// The contents are used as-is (a trailing newline is part of the key).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::ReadSecret {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret(path.to_path_buf()));
        }
        Ok(Self(SecretVec::new(bytes)))
    }

    /// Wrap secret bytes obtained elsewhere (tests, embedding)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ConfigError> {
        if bytes.is_empty() {
            return Err(ConfigError::EmptySecret("<inline>".into()));
        }
        Ok(Self(SecretVec::new(bytes)))
    }

    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.expose().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServerSecret([REDACTED {} bytes])", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slayer-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_reads_file_verbatim() {
        let path = temp_path("secret");
        std::fs::write(&path, b"top-secret\n").unwrap();

        let secret = ServerSecret::from_file(&path).unwrap();
        assert_eq!(secret.expose(), b"top-secret\n");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = temp_path("missing");
        let err = ServerSecret::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadSecret { .. }));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let path = temp_path("empty");
        std::fs::write(&path, b"").unwrap();

        let err = ServerSecret::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySecret(_)));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_debug_does_not_leak() {
        let secret = ServerSecret::from_bytes(b"hunter2".to_vec()).unwrap();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("7 bytes"));
    }
}
