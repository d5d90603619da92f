//! # auth-adapters
//!
//! Argon2-based implementation of the `PasswordHasher` port, plus the JWT
//! `AuthTokens` implementation behind the `auth-jwt` feature. The core only
//! ever sees opaque hashes and opaque tokens.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use domains::{DomainError, Result};

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokens;

/// Hashes passwords with Argon2id and a per-password random salt. The salt
/// and parameters travel inside the PHC hash string, so verification needs
/// no extra state.
#[derive(Default)]
pub struct ArgonPasswordHasher;

impl ArgonPasswordHasher {
    pub fn new() -> Self {
        ArgonPasswordHasher
    }
}

impl domains::PasswordHasher for ArgonPasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| DomainError::Internal(format!("password hashing failed: {err}")))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash failed to parse");
            return false;
        };
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::PasswordHasher;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = ArgonPasswordHasher::new();
        let hash = hasher.hash("correct horse battery").unwrap();
        assert!(hasher.verify("correct horse battery", &hash));
        assert!(!hasher.verify("wrong password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let hasher = ArgonPasswordHasher::new();
        assert!(!hasher.verify("anything", "not-a-phc-string"));
    }
}
