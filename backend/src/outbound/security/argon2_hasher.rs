//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are stored in PHC string format, so parameters and salt travel
//! with the hash and older hashes keep verifying after a parameter change.

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

/// Argon2id with the crate's default parameters.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a hasher with default parameters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Ok(PasswordHash::new(encoded.to_string()))
    }

    fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let parsed = PhcHash::new(hash.as_str())
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    fn password(raw: &str) -> Password {
        Password::for_verification(raw).expect("password")
    }

    #[rstest]
    fn hash_verifies_the_same_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("segredo123")).expect("hash");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&password("segredo123"), &hash).expect("verify"));
    }

    #[rstest]
    fn wrong_password_does_not_verify(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("segredo123")).expect("hash");

        assert!(!hasher.verify(&password("outra-senha"), &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("segredo123")).expect("hash");
        let second = hasher.hash(&password("segredo123")).expect("hash");

        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn garbage_hash_is_malformed(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&password("segredo123"), &PasswordHash::new("not-a-phc-string"))
            .expect_err("malformed");

        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
