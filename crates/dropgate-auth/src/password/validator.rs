//! Password policy enforcement for new account passwords.

use dropgate_core::config::auth::AuthConfig;
use dropgate_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Password is too weak. Please use a harder-to-guess password.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator {
            min_length: 8,
        }
    }

    #[test]
    fn test_rejects_short_passwords() {
        assert!(validator().validate("short").is_err());
    }

    #[test]
    fn test_rejects_guessable_passwords() {
        assert!(validator().validate("password").is_err());
    }

    #[test]
    fn test_accepts_reasonable_passwords() {
        assert!(validator().validate("tr4verse-moat-9").is_ok());
    }
}
