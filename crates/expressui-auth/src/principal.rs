//! A materialized user with its roles.

use serde::Serialize;

use expressui_core::result::AppResult;
use expressui_entity::role::Role;
use expressui_entity::user::User;

use crate::rbac::PermissionResolver;

/// A user together with every role assigned to it.
///
/// The snapshot is loaded per request and not refreshed; load a new one to
/// see later permission changes. A user's permission is the union of its
/// roles: one granting role is enough, regardless of how many deny.
#[derive(Debug, Clone, Serialize)]
pub struct SecuredUser {
    /// The user.
    pub user: User,
    /// Assigned roles, with their permissions.
    pub roles: Vec<Role>,
}

impl SecuredUser {
    /// Wrap a user and its roles.
    pub fn new(user: User, roles: Vec<Role>) -> Self {
        Self { user, roles }
    }

    /// The user's login name.
    pub fn login_name(&self) -> &str {
        &self.user.login_name
    }

    /// Names of the assigned roles.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Whether a role with this name is assigned.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    /// First role to answer `true` wins; the first error aborts.
    fn any_role(&self, check: impl Fn(&Role) -> AppResult<bool>) -> AppResult<bool> {
        for role in &self.roles {
            if check(role)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl PermissionResolver for SecuredUser {
    fn principal_name(&self) -> &str {
        self.login_name()
    }

    fn is_view_allowed(&self, entity_type: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_view_allowed(entity_type))
    }

    fn is_create_allowed(&self, entity_type: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_create_allowed(entity_type))
    }

    fn is_edit_allowed(&self, entity_type: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_edit_allowed(entity_type))
    }

    fn is_delete_allowed(&self, entity_type: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_delete_allowed(entity_type))
    }

    fn is_field_view_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_field_view_allowed(entity_type, field))
    }

    fn is_field_edit_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool> {
        self.any_role(|role| role.is_field_edit_allowed(entity_type, field))
    }
}
