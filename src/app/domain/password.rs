use argon2::{
    password_hash::SaltString,
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand_core::OsRng;
use validator::ValidationError;

/// Minimum accepted password length at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length at sign-up.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Plaintext password that has passed sign-up length rules.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Wrap a submitted password for checking against a stored hash.
    /// Length rules are not applied: they belong to sign-up, not sign-in.
    pub fn for_verification(plaintext: String) -> Self {
        Self(plaintext)
    }

    /// Validate a new password. Only length is enforced.
    pub fn new(password: String) -> Result<Self, ValidationError> {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::new("password_too_short")
                .with_message("Password is too short".into()));
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(ValidationError::new("password_too_long")
                .with_message("Password is too long".into()));
        }
        Ok(Self(password))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Plaintext, for handing a generated password to an operator once.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Argon2id hash in PHC string format.
#[derive(Debug, Clone)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash a password with a random salt.
    pub fn from_password(password: &Password) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self(hash.to_string()))
    }

    /// Verify a password against this hash.
    pub fn verify(&self, password: &Password) -> Result<(), argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(&self.0)?;
        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
    }

    /// Wrap a hash loaded from the database.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_only_password() {
        assert!(Password::new("correcthorse".to_string()).is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let err = Password::new("short".to_string()).unwrap_err();
        assert_eq!(err.code, "password_too_short");
    }

    #[test]
    fn rejects_long_password() {
        let err = Password::new("a".repeat(MAX_PASSWORD_LENGTH + 1)).unwrap_err();
        assert_eq!(err.code, "password_too_long");
    }

    #[test]
    fn debug_does_not_leak_plaintext() {
        let password = Password::new("supersecret".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("supersecret"));
    }

    #[test]
    fn hash_and_verify() {
        let password = Password::new("TestPassword123".to_string()).unwrap();
        let hash = HashedPassword::from_password(&password).unwrap();
        assert!(hash.verify(&password).is_ok());
        assert!(hash.verify(&Password::for_verification("nope".to_string())).is_err());
    }
}
