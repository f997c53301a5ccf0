//! One-way hashing for passwords and security answers.
//!
//! Secrets are stored as argon2id PHC strings, which embed the salt and the
//! cost parameters, so verification works across parameter changes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{Error, Result};

#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    /// Builds a hasher with explicit argon2id costs (memory in KiB, passes, lanes).
    pub fn with_costs(memory_kib: u32, passes: u32, lanes: u32) -> Result<Self> {
        let params = Params::new(memory_kib, passes, lanes, None).map_err(hash_error)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(hash_error)
    }

    /// Returns `Ok(false)` on a mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify(&self, secret: &str, stored: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored).map_err(hash_error)?;
        match self.argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(hash_error(e)),
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

fn hash_error(err: impl std::fmt::Display) -> Error {
    Error::Hash(err.to_string())
}
