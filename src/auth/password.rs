//! Argon2 password hashing
//!
//! Hashes are stored in PHC string format, so parameters and salt travel with
//! the hash.

use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::services::traits::{PasswordHasher, PasswordMatcher};

/// Argon2id with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }
}

impl PasswordMatcher for Argon2Hasher {
    fn match_password(&self, password: &str, hashed: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hashed).map_err(|e| anyhow!("malformed password hash: {e}"))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("failed to verify password: {e}")),
        }
    }
}
