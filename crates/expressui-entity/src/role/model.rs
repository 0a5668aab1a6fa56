//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use validator::Validate;

use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_core::types::RoleId;

use super::policy::DefaultPolicy;
use crate::permission::Permission;

/// A named bundle of permission records plus a default policy.
///
/// The role owns its permissions: removing the role removes them. At most
/// one record may exist per `(entity_type, field)` scope; the lookups
/// below treat a second match as a data-integrity violation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Unique role name.
    #[validate(length(min = 4, max = 64))]
    pub name: String,
    /// Outcome when no permission record matches.
    pub default_policy: DefaultPolicy,
    /// Free-form description shown in the admin screens.
    #[validate(length(max = 255))]
    pub description: Option<String>,
    /// Permission records owned by this role.
    #[validate(nested)]
    pub permissions: Vec<Permission>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Create a role with no permission records.
    pub fn new(name: impl Into<String>, default_policy: DefaultPolicy) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::new(),
            name: name.into(),
            default_policy,
            description: None,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a permission record, re-homing it to this role.
    ///
    /// No uniqueness check happens here; writes through the store do that.
    pub fn with_permission(mut self, mut permission: Permission) -> Self {
        permission.role_id = self.id;
        self.permissions.push(permission);
        self
    }

    /// Whether unmatched queries are allowed.
    pub fn allows_by_default(&self) -> bool {
        self.default_policy.allows()
    }

    /// The type-level record for `entity_type`, if any.
    pub fn type_permission(&self, entity_type: &str) -> AppResult<Option<&Permission>> {
        self.unique_permission(entity_type, None)
    }

    /// The field-level record for `entity_type.field`, if any.
    pub fn field_permission(
        &self,
        entity_type: &str,
        field: &str,
    ) -> AppResult<Option<&Permission>> {
        self.unique_permission(entity_type, Some(field))
    }

    /// Every type-level record.
    pub fn type_permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter().filter(|p| p.is_type_level())
    }

    /// Every field-level record for one entity type.
    pub fn field_permissions<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a Permission> + 'a {
        self.permissions
            .iter()
            .filter(move |p| !p.is_type_level() && p.entity_type == entity_type)
    }

    fn unique_permission(
        &self,
        entity_type: &str,
        field: Option<&str>,
    ) -> AppResult<Option<&Permission>> {
        let mut matches = self
            .permissions
            .iter()
            .filter(|p| p.matches_scope(entity_type, field));

        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            let scope = match field {
                Some(field) => format!("{entity_type}.{field}"),
                None => entity_type.to_string(),
            };
            error!(
                role = %self.name,
                scope = %scope,
                count = extra + 1,
                "Duplicate permission records for one scope"
            );
            return Err(AppError::integrity(format!(
                "Role '{}' has {} permission records for '{scope}'; expected at most one",
                self.name,
                extra + 1
            )));
        }
        Ok(first)
    }
}
