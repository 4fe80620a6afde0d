//! Password hashing.
//!
//! New passwords are hashed with Argon2id into PHC strings. Verification
//! reads its parameters from the stored hash, so parameter changes never
//! invalidate existing credentials.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is longer than [`MAX_PASSWORD_LENGTH`].
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// The hasher itself failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored hash could not be parsed.
    #[error("stored hash is not a valid PHC string")]
    BadStoredHash,

    /// The password does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
}

/// Hasher used for new passwords.
///
/// Release builds take the `argon2` crate defaults (Argon2id, ~19 MiB
/// memory, 2 iterations). Unit tests get minimal parameters so suites
/// that register users stay fast; the resulting hashes verify the same
/// way since parameters live in the PHC string.
fn hasher() -> Argon2<'static> {
    #[cfg(not(test))]
    {
        Argon2::default()
    }

    #[cfg(test)]
    {
        use argon2::{Algorithm, Params, Version};

        let params = Params::new(1024, 1, 1, None).expect("valid Argon2 params");
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

/// Hash a password with a fresh random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash.
pub fn verify_password(password: &str, stored: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::BadStoredHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// Check password length bounds.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    match password.len() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordError::TooShort),
        n if n > MAX_PASSWORD_LENGTH => Err(PasswordError::TooLong),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct_password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct_password", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_is_mismatch() {
        let hash = hash_password("correct_password").unwrap();
        assert!(matches!(
            verify_password("wrong_password", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let first = hash_password("same_password").unwrap();
        let second = hash_password("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_garbage_stored_hash() {
        assert!(matches!(
            verify_password("any_password", "not_a_phc_string"),
            Err(PasswordError::BadStoredHash)
        ));
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            validate_password("short"),
            Err(PasswordError::TooShort)
        ));
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"a".repeat(MAX_PASSWORD_LENGTH)).is_ok());
        assert!(matches!(
            validate_password(&"a".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(PasswordError::TooLong)
        ));
    }

    #[test]
    fn test_hash_rejects_out_of_bounds_input() {
        assert!(hash_password("short").is_err());
        assert!(hash_password(&"a".repeat(MAX_PASSWORD_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_special_characters_survive() {
        let password = "p@$$w0rd!#$%^&*()";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }
}
