//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{PayrollError, PayrollResult};

/// Hashes a password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> PayrollResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PayrollError::validation("password", format!("cannot be hashed: {}", e)))
}

/// Checks a password against a PHC string.
///
/// Returns `Ok(false)` for a wrong password and an error only if the stored
/// hash is malformed.
pub fn verify_password(password: &str, hashed: &str) -> PayrollResult<bool> {
    let parsed = PasswordHash::new(hashed).map_err(|e| PayrollError::ConfigParseError {
        path: "auth".to_string(),
        message: format!("malformed password hash: {}", e),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("123", &hash).unwrap());
        assert!(!verify_password("124", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(matches!(
            verify_password("123", "not-a-hash"),
            Err(PayrollError::ConfigParseError { .. })
        ));
    }
}
