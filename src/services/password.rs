use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose, Engine as _};
use rand::rngs::OsRng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::str::FromStr;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

/// How new credentials are stored.
///
/// `Argon2` produces a salted PHC string. `Sha256` is the legacy format: base64 of the
/// unsalted SHA-256 digest, kept so existing rows can still be written and verified.
/// Verification picks the algorithm from the stored value, not from the configured
/// scheme, so legacy rows keep working after switching to `Argon2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    #[default]
    Argon2,
    Sha256,
}

impl PasswordScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::Argon2 => "argon2",
            PasswordScheme::Sha256 => "sha256",
        }
    }

    /// Compute the stored representation of a password
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        match self {
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(plaintext.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
            }
            PasswordScheme::Sha256 => Ok(legacy_digest(plaintext)),
        }
    }

    /// Verify a password against a stored hash of either format
    pub fn verify(&self, plaintext: &str, stored: &str) -> Result<bool> {
        if stored.starts_with('$') {
            let parsed = match PasswordHash::new(stored) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Stored password hash is not a valid PHC string: {}", e);
                    return Ok(false);
                }
            };
            return Ok(Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok());
        }

        Ok(constant_time_eq(&legacy_digest(plaintext), stored))
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "argon2" => Ok(PasswordScheme::Argon2),
            "sha256" => Ok(PasswordScheme::Sha256),
            other => Err(format!("unknown password scheme: {}", other)),
        }
    }
}

fn legacy_digest(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    general_purpose::STANDARD.encode(digest)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
