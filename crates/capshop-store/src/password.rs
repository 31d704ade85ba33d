//! Password hashing using Argon2id.
//!
//! The mock directory never keeps a plaintext password. Records hold a PHC
//! string (`$argon2id$v=19$m=...`) with its own random salt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::SessionConfig;
use crate::error::AuthError;

/// Argon2id hasher configured from [`SessionConfig`].
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    pepper: Option<String>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", &self.params)
            .field("pepper", &self.pepper.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PasswordHasher {
    pub fn from_config(config: &SessionConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| AuthError::Unexpected(format!("invalid argon2 parameters: {}", e)))?;

        Ok(PasswordHasher {
            params,
            pepper: config.pepper.clone(),
        })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn peppered(&self, password: &str) -> String {
        match &self.pepper {
            Some(p) => format!("{p}{password}"),
            None => password.to_string(),
        }
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(self.peppered(password).as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Checks a password against a stored PHC string.
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash)?;
        match self
            .argon2()
            .verify_password(self.peppered(password).as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
