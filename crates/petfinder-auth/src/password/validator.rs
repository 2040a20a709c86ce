//! Password policy for new accounts.

use petfinder_core::config::AuthConfig;
use petfinder_core::error::AppError;

/// Validates passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    /// Minimum zxcvbn score; 0 disables the entropy check.
    min_score: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Validates a new password.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if self.min_score > 0 && Self::strength(password, &[]) < self.min_score {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password.",
            ));
        }

        Ok(())
    }

    /// Checks the confirmation field of a registration form.
    pub fn validate_confirmation(&self, password: &str, confirmation: &str) -> Result<(), AppError> {
        if password != confirmation {
            return Err(AppError::validation("Passwords do not match"));
        }
        Ok(())
    }

    /// zxcvbn score (0-4), penalising passwords built from `user_inputs`.
    pub fn strength(password: &str, user_inputs: &[&str]) -> u8 {
        zxcvbn::zxcvbn(password, user_inputs).score() as u8
    }
}
