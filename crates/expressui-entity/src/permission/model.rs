//! Permission record model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use expressui_core::types::{PermissionId, RoleId};

use super::action::PermissionAction;

/// One allow/deny rule owned by a role.
///
/// A record with `field == None` covers the whole entity type; otherwise it
/// covers a single property of that type. The four flags are independent.
/// Entity types and fields are plain strings compared by equality; whether
/// they name a real type is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: PermissionId,
    /// The owning role.
    pub role_id: RoleId,
    /// Entity type name the rule applies to.
    #[validate(length(min = 1, max = 255))]
    pub entity_type: String,
    /// Property name, or `None` for a type-level rule.
    #[validate(length(min = 1, max = 255))]
    pub field: Option<String>,
    /// Whether viewing is allowed.
    pub view_allowed: bool,
    /// Whether creating is allowed.
    pub create_allowed: bool,
    /// Whether editing is allowed.
    pub edit_allowed: bool,
    /// Whether deleting is allowed.
    pub delete_allowed: bool,
}

impl Permission {
    /// A type-level rule denying every action until granted.
    pub fn for_type(role_id: RoleId, entity_type: impl Into<String>) -> Self {
        Self {
            id: PermissionId::new(),
            role_id,
            entity_type: entity_type.into(),
            field: None,
            view_allowed: false,
            create_allowed: false,
            edit_allowed: false,
            delete_allowed: false,
        }
    }

    /// A field-level rule denying every action until granted.
    pub fn for_field(
        role_id: RoleId,
        entity_type: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::for_type(role_id, entity_type)
        }
    }

    /// Set the flag for one action.
    pub fn with(mut self, action: PermissionAction, allowed: bool) -> Self {
        match action {
            PermissionAction::View => self.view_allowed = allowed,
            PermissionAction::Create => self.create_allowed = allowed,
            PermissionAction::Edit => self.edit_allowed = allowed,
            PermissionAction::Delete => self.delete_allowed = allowed,
        }
        self
    }

    /// Allow one action.
    pub fn grant(self, action: PermissionAction) -> Self {
        self.with(action, true)
    }

    /// Return the flag for one action.
    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::View => self.view_allowed,
            PermissionAction::Create => self.create_allowed,
            PermissionAction::Edit => self.edit_allowed,
            PermissionAction::Delete => self.delete_allowed,
        }
    }

    /// Whether this rule covers a whole entity type.
    pub fn is_type_level(&self) -> bool {
        self.field.is_none()
    }

    /// Whether this rule covers exactly the given scope.
    pub fn matches_scope(&self, entity_type: &str, field: Option<&str>) -> bool {
        self.entity_type == entity_type && self.field.as_deref() == field
    }

    /// Whether two rules cover the same `(entity_type, field)` scope.
    pub fn same_scope(&self, other: &Permission) -> bool {
        self.matches_scope(&other.entity_type, other.field.as_deref())
    }

    /// Human-readable scope, e.g. `Invoice` or `Invoice.amount`.
    pub fn scope_label(&self) -> String {
        match &self.field {
            Some(field) => format!("{}.{}", self.entity_type, field),
            None => self.entity_type.clone(),
        }
    }
}
