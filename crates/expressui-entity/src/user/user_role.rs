//! User-to-role association.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use expressui_core::types::{RoleId, UserId};

/// Grants one role to one user.
///
/// Identity is the `(user_id, role_id)` pair; there is no separate key.
/// Deleting either side removes the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// The user holding the role.
    pub user_id: UserId,
    /// The granted role.
    pub role_id: RoleId,
    /// When the role was assigned.
    pub created_at: DateTime<Utc>,
}

impl UserRole {
    /// Link a user to a role.
    pub fn new(user_id: UserId, role_id: RoleId) -> Self {
        Self {
            user_id,
            role_id,
            created_at: Utc::now(),
        }
    }

    /// The composite key.
    pub fn key(&self) -> (UserId, RoleId) {
        (self.user_id, self.role_id)
    }
}
