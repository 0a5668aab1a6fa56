//! Password policy for new and changed passwords.

use expressui_core::config::SecurityConfig;
use expressui_core::error::AppError;

/// Character classes a strong password must draw from, with the wording
/// used when one is missing.
const CHARACTER_CLASSES: [(&str, fn(char) -> bool); 4] = [
    ("an upper-case letter", char::is_uppercase),
    ("a lower-case letter", char::is_lowercase),
    ("a digit", |c| c.is_ascii_digit()),
    ("a symbol", |c| !c.is_alphanumeric()),
];

/// Checks passwords against the configured policy.
///
/// The minimum length always applies. With strength enforcement on, a
/// password must also mix every character class and reach a zxcvbn score
/// of at least three.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    enforce_strength: bool,
}

impl PasswordValidator {
    /// Build the policy from security configuration.
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            enforce_strength: config.enforce_password_strength,
        }
    }

    /// Returns a `Validation` error naming everything the password lacks.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password is shorter than {} characters",
                self.min_length
            )));
        }
        if !self.enforce_strength {
            return Ok(());
        }

        let missing: Vec<&str> = CHARACTER_CLASSES
            .iter()
            .filter(|(_, belongs)| !password.chars().any(*belongs))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "Password needs {}",
                missing.join(", ")
            )));
        }

        if zxcvbn::zxcvbn(password, &[]).score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too easy to guess; try a longer passphrase",
            ));
        }
        Ok(())
    }

    /// Rejects a new password equal to the current one.
    pub fn validate_not_same(&self, current: &str, new: &str) -> Result<(), AppError> {
        if current == new {
            return Err(AppError::validation("New password matches the current one"));
        }
        Ok(())
    }
}
