//! Password hashing and registration policy.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("salt generation failed: {0}")]
    Salt(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Salt(e.to_string()))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a password against a stored PHC hash.
///
/// An unparseable stored hash counts as a failed check, not an error.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

/// First registration-policy rule the candidate password fails, if any.
pub fn policy_violation(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        return Some("Passwords must be at least 8 characters.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Passwords must have at least one digit.");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Some("Passwords must have at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Some("Passwords must have at least one lowercase letter.");
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Some("Passwords must have at least one non-alphanumeric character.");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let phc = hash_password("P@ssw0rd1").unwrap();
        assert!(verify_password(&phc, "P@ssw0rd1"));
        assert!(!verify_password(&phc, "P@ssw0rd2"));
    }

    #[test]
    fn two_hashes_of_same_password_differ() {
        let a = hash_password("P@ssw0rd1").unwrap();
        let b = hash_password("P@ssw0rd1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "P@ssw0rd1"));
    }

    #[test]
    fn policy_accepts_reference_password() {
        assert_eq!(policy_violation("P@ssw0rd1"), None);
    }

    #[test]
    fn policy_reports_first_failing_rule() {
        assert_eq!(
            policy_violation("short"),
            Some("Passwords must be at least 8 characters.")
        );
        assert_eq!(
            policy_violation("NoDigits!"),
            Some("Passwords must have at least one digit.")
        );
        assert_eq!(
            policy_violation("nodigit8!"),
            Some("Passwords must have at least one uppercase letter.")
        );
        assert_eq!(
            policy_violation("Password1"),
            Some("Passwords must have at least one non-alphanumeric character.")
        );
    }
}
