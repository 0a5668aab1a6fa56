//! Authentication and password policy configuration.

use serde::{Deserialize, Serialize};

/// Password policy settings applied when users are created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether to require mixed character classes and a zxcvbn score of at least three.
    #[serde(default = "default_true")]
    pub enforce_password_strength: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min(),
            enforce_password_strength: default_true(),
        }
    }
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}
