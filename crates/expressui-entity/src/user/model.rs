//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use expressui_core::types::UserId;

/// A principal that can log in and hold roles.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    #[validate(length(min = 4, max = 16))]
    pub login_name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account validity has lapsed.
    pub account_expired: bool,
    /// Account was locked by an administrator.
    pub account_locked: bool,
    /// Password must be changed before logging in.
    pub credentials_expired: bool,
    /// Account is enabled.
    pub enabled: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an enabled user with the given password hash.
    pub fn new(login_name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            login_name: login_name.into(),
            password_hash: password_hash.into(),
            account_expired: false,
            account_locked: false,
            credentials_expired: false,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Why this account cannot log in, or `None` if it can.
    pub fn login_blocker(&self) -> Option<&'static str> {
        if !self.enabled {
            Some("Account is disabled")
        } else if self.account_locked {
            Some("Account is locked")
        } else if self.account_expired {
            Some("Account has expired")
        } else if self.credentials_expired {
            Some("Credentials have expired")
        } else {
            None
        }
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.login_blocker().is_none()
    }
}
