use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::IdentityError;

/// Password strength rules applied on registration and password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

impl PasswordPolicy {
    /// Reports every rule the password breaks, not just the first.
    pub fn check(&self, password: &str) -> Result<(), IdentityError> {
        let mut failures = Vec::new();

        if password.chars().count() < self.min_length {
            failures.push(format!("must be at least {} characters", self.min_length));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            failures.push("must contain a digit".to_string());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            failures.push("must contain a lowercase letter".to_string());
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            failures.push("must contain an uppercase letter".to_string());
        }
        if self.require_non_alphanumeric && password.chars().all(char::is_alphanumeric) {
            failures.push("must contain a non-alphanumeric character".to_string());
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(IdentityError::WeakPassword(failures))
        }
    }
}

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, IdentityError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| IdentityError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Pa$$w0rd").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("Pa$$w0rd", &hash).unwrap());
        assert!(!verify_password("pa$$w0rd", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let first = hash_password("Pa$$w0rd").unwrap();
        let second = hash_password("Pa$$w0rd").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("Pa$$w0rd", "not-a-hash"),
            Err(IdentityError::Hashing(_))
        ));
    }

    #[test]
    fn test_default_policy() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("Pa$$w0rd").is_ok());

        match policy.check("abc") {
            Err(IdentityError::WeakPassword(failures)) => {
                assert_eq!(failures.len(), 4);
                assert!(failures[0].contains("at least 6"));
            }
            other => panic!("expected a weak password, got {other:?}"),
        }

        assert!(matches!(
            policy.check("Password1"),
            Err(IdentityError::WeakPassword(failures)) if failures.len() == 1
        ));
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_digit: false,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        };
        assert!(policy.check("secret").is_ok());
        assert!(policy.check("abc").is_err());
    }
}
