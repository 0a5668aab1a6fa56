//! Actions a permission record can allow or deny.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action checked against role permissions.
///
/// `View` and `Edit` exist at both entity and field scope. `Create` and
/// `Delete` are whole-entity actions only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// Read an entity or field.
    View,
    /// Create a new entity.
    Create,
    /// Modify an existing entity or field.
    Edit,
    /// Delete an entity.
    Delete,
}

impl PermissionAction {
    /// Every action, in display order.
    pub const ALL: [PermissionAction; 4] = [Self::View, Self::Create, Self::Edit, Self::Delete];

    /// Whether the action can be scoped to a single field.
    pub fn is_field_scoped(&self) -> bool {
        matches!(self, Self::View | Self::Edit)
    }

    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = expressui_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(expressui_core::AppError::validation(format!(
                "Invalid permission action: '{s}'. Expected one of: view, create, edit, delete"
            ))),
        }
    }
}
