//! Password hashing with Argon2

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use tracing::error;

use crate::error::ApiError;

/// Hash a plain-text password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })
}

/// Verify a plain-text password against a stored PHC hash string
///
/// A mismatch is `Ok(false)`; an unparseable stored hash is an internal error.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {}", e);
        ApiError::InternalServerError
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!("Password verification failed: {}", e);
            Err(ApiError::InternalServerError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("secret123").unwrap();
        let second = hash_password("secret123").unwrap();

        assert_ne!(first, "secret123");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
        assert!(verify_password(&first, "secret123").unwrap());
        assert!(!verify_password(&first, "secret124").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("not-a-phc-string", "secret123"),
            Err(ApiError::InternalServerError)
        ));
    }
}
