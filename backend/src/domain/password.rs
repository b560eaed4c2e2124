//! Credential hashing.
//!
//! The original tracker stored and compared passwords in plain text; that is
//! not preserved here. Secrets are hashed with Argon2id and only the PHC
//! string ever reaches a store.

use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash as PhcHash};
use serde::{Deserialize, Serialize};

/// Errors raised while deriving or verifying a credential hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive rejected its input.
    #[error("failed to derive password hash: {message}")]
    Derive {
        /// Underlying hasher message.
        message: String,
    },
    /// A stored hash is not a parseable PHC string.
    #[error("stored password hash is malformed")]
    Malformed,
}

/// Argon2id credential hash in PHC string format.
///
/// Holds only the derived hash; the raw secret is dropped after
/// [`PasswordHash::derive`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a raw secret with a fresh random salt.
    pub fn derive(secret: &str) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|error| PasswordHashError::Derive {
                message: error.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Check a raw secret against this hash.
    ///
    /// Returns `Err` only when the stored hash itself is malformed; a
    /// mismatching secret is `Ok(false)`.
    pub fn verify(&self, secret: &str) -> Result<bool, PasswordHashError> {
        let parsed = PhcHash::new(&self.0).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }

    /// Reconstruct from a stored PHC string without re-validating.
    ///
    /// Malformed strings surface later as [`PasswordHashError::Malformed`]
    /// from [`PasswordHash::verify`].
    pub fn from_phc_string(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string for persistence.
    pub fn as_phc_string(&self) -> &str {
        self.0.as_str()
    }
}
