//! Permission scope uniqueness rules.
//!
//! The resolver expects at most one permission per `(entity_type, field)`
//! scope within a role. Writes that would break this are rejected here
//! instead of being merged.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_entity::permission::Permission;
use expressui_entity::role::Role;

/// A scope held by more than one permission record in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateScope {
    /// The role holding the duplicates.
    pub role_name: String,
    /// Entity type of the scope.
    pub entity_type: String,
    /// Field of the scope, `None` for type level.
    pub field: Option<String>,
    /// Number of records found for the scope.
    pub count: usize,
}

/// Checks permission writes against the one-record-per-scope rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionValidator;

impl PermissionValidator {
    /// Creates a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Rejects `candidate` if `role` already holds a different record for
    /// the same scope.
    ///
    /// A record with the candidate's own id is the same logical record and
    /// does not conflict.
    pub fn validate(&self, role: &Role, candidate: &Permission) -> AppResult<()> {
        let conflict = role
            .permissions
            .iter()
            .find(|existing| existing.id != candidate.id && existing.same_scope(candidate));

        if let Some(existing) = conflict {
            warn!(
                role = %role.name,
                scope = %candidate.scope_label(),
                existing_id = %existing.id,
                "Rejected duplicate permission"
            );
            return Err(AppError::conflict(format!(
                "Role '{}' already has a permission for '{}'",
                role.name,
                candidate.scope_label()
            )));
        }
        Ok(())
    }

    /// Lists every scope in `role` covered by more than one record.
    pub fn audit(&self, role: &Role) -> Vec<DuplicateScope> {
        let mut counts: BTreeMap<(&str, Option<&str>), usize> = BTreeMap::new();
        for perm in &role.permissions {
            *counts
                .entry((perm.entity_type.as_str(), perm.field.as_deref()))
                .or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|((entity_type, field), count)| DuplicateScope {
                role_name: role.name.clone(),
                entity_type: entity_type.to_string(),
                field: field.map(str::to_string),
                count,
            })
            .collect()
    }

    /// Fails with a conflict listing every duplicated scope in `role`.
    pub fn require_unique(&self, role: &Role) -> AppResult<()> {
        let duplicates = self.audit(role);
        if duplicates.is_empty() {
            return Ok(());
        }

        let scopes: Vec<String> = duplicates
            .iter()
            .map(|d| match &d.field {
                Some(field) => format!("{}.{field} (x{})", d.entity_type, d.count),
                None => format!("{} (x{})", d.entity_type, d.count),
            })
            .collect();
        Err(AppError::conflict(format!(
            "Role '{}' has duplicate permissions: {}",
            role.name,
            scopes.join(", ")
        )))
    }
}
