//! Password hash utility.
//!
//! Wraps Argon2id behind a two-method surface: `hash` produces a PHC-format
//! digest, `verify` checks a candidate against one. The digest string
//! carries its own cost parameters, so verification always uses the cost
//! that produced the digest regardless of this instance's settings.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// One-way password hashing with a configurable cost.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a hasher with the given Argon2 cost (memory in KiB,
    /// iteration count, single lane).
    ///
    /// # Errors
    ///
    /// Returns `Internal` when the parameters are outside Argon2's accepted
    /// range.
    pub fn new(memory_kib: u32, iterations: u32) -> ServerResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|err| ServerError::Internal(format!("invalid hash cost: {err}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Creates a hasher from the server configuration.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        Self::new(config.hash_memory_kib, config.hash_iterations)
    }

    /// Hashes arbitrary text into a PHC-format digest. The empty string is
    /// a valid input.
    pub fn hash(&self, text: &str) -> ServerResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(text.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|err| ServerError::Internal(format!("hashing failed: {err}")))
    }

    /// Verifies text against a stored digest. A malformed digest verifies
    /// as false, never as an error.
    pub fn verify(&self, text: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
