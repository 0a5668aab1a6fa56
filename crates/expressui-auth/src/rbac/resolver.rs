//! Permission resolution for a single role.
//!
//! Type-level queries use the role's record for the entity type, falling
//! back to the role's default policy when there is none. Field-level
//! queries use the field record when present and never combine it with
//! anything else. Without a field record, view falls back to type-level
//! view, while edit falls back to type-level edit OR create, so that
//! fields on a new-entity form are editable by anyone allowed to create.
//!
//! Every query fails with an `Integrity` error when a scope it reads is
//! covered by more than one record.

use expressui_core::result::AppResult;
use expressui_entity::permission::PermissionAction;
use expressui_entity::role::Role;

/// Answers view/create/edit/delete questions about entity types and fields.
///
/// Entity types and fields are plain names compared by string equality.
pub trait PermissionResolver {
    /// Name used in logs for the party being checked.
    fn principal_name(&self) -> &str;

    /// Whether the entity type may be viewed.
    fn is_view_allowed(&self, entity_type: &str) -> AppResult<bool>;

    /// Whether new entities of the type may be created.
    fn is_create_allowed(&self, entity_type: &str) -> AppResult<bool>;

    /// Whether existing entities of the type may be edited.
    fn is_edit_allowed(&self, entity_type: &str) -> AppResult<bool>;

    /// Whether entities of the type may be deleted.
    fn is_delete_allowed(&self, entity_type: &str) -> AppResult<bool>;

    /// Whether one field of the entity type may be viewed.
    fn is_field_view_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool>;

    /// Whether one field of the entity type may be edited.
    fn is_field_edit_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool>;

    /// Type-level check for any action.
    fn is_allowed(&self, action: PermissionAction, entity_type: &str) -> AppResult<bool> {
        match action {
            PermissionAction::View => self.is_view_allowed(entity_type),
            PermissionAction::Create => self.is_create_allowed(entity_type),
            PermissionAction::Edit => self.is_edit_allowed(entity_type),
            PermissionAction::Delete => self.is_delete_allowed(entity_type),
        }
    }
}

fn type_level(role: &Role, action: PermissionAction, entity_type: &str) -> AppResult<bool> {
    Ok(match role.type_permission(entity_type)? {
        Some(permission) => permission.allows(action),
        None => role.allows_by_default(),
    })
}

impl PermissionResolver for Role {
    fn principal_name(&self) -> &str {
        &self.name
    }

    fn is_view_allowed(&self, entity_type: &str) -> AppResult<bool> {
        type_level(self, PermissionAction::View, entity_type)
    }

    fn is_create_allowed(&self, entity_type: &str) -> AppResult<bool> {
        type_level(self, PermissionAction::Create, entity_type)
    }

    fn is_edit_allowed(&self, entity_type: &str) -> AppResult<bool> {
        type_level(self, PermissionAction::Edit, entity_type)
    }

    fn is_delete_allowed(&self, entity_type: &str) -> AppResult<bool> {
        type_level(self, PermissionAction::Delete, entity_type)
    }

    fn is_field_view_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool> {
        match self.field_permission(entity_type, field)? {
            Some(permission) => Ok(permission.view_allowed),
            None => self.is_view_allowed(entity_type),
        }
    }

    fn is_field_edit_allowed(&self, entity_type: &str, field: &str) -> AppResult<bool> {
        match self.field_permission(entity_type, field)? {
            Some(permission) => Ok(permission.edit_allowed),
            None => Ok(self.is_edit_allowed(entity_type)? || self.is_create_allowed(entity_type)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expressui_entity::permission::Permission;
    use expressui_entity::role::DefaultPolicy;

    fn viewer() -> Role {
        let role = Role::new("Viewer", DefaultPolicy::Deny);
        let id = role.id;
        role.with_permission(Permission::for_type(id, "Invoice").grant(PermissionAction::View))
    }

    fn all_type_level(role: &Role, entity_type: &str) -> Vec<bool> {
        PermissionAction::ALL
            .iter()
            .map(|action| role.is_allowed(*action, entity_type).unwrap())
            .collect()
    }

    #[test]
    fn test_default_policy_applies_without_record() {
        let allow = Role::new("Admin", DefaultPolicy::Allow);
        let deny = Role::new("Guest", DefaultPolicy::Deny);

        assert_eq!(all_type_level(&allow, "Invoice"), vec![true; 4]);
        assert_eq!(all_type_level(&deny, "Invoice"), vec![false; 4]);
    }

    #[test]
    fn test_type_record_overrides_default_policy() {
        for policy in [DefaultPolicy::Allow, DefaultPolicy::Deny] {
            let role = Role::new("Mixed", policy);
            let id = role.id;
            let role = role.with_permission(
                Permission::for_type(id, "Invoice")
                    .grant(PermissionAction::Create)
                    .grant(PermissionAction::Delete),
            );

            assert_eq!(all_type_level(&role, "Invoice"), vec![false, true, false, true]);
        }
    }

    #[test]
    fn test_field_view_falls_back_to_type_level() {
        let role = viewer();
        assert!(role.is_field_view_allowed("Invoice", "amount").unwrap());
        assert!(!role.is_field_view_allowed("Customer", "name").unwrap());
    }

    #[test]
    fn test_field_record_is_authoritative() {
        let role = viewer();
        let id = role.id;
        let role = role.with_permission(Permission::for_field(id, "Invoice", "amount"));

        // Type level allows view, the field record denies it.
        assert!(!role.is_field_view_allowed("Invoice", "amount").unwrap());
        assert!(role.is_field_view_allowed("Invoice", "number").unwrap());
    }

    #[test]
    fn test_field_edit_falls_back_to_edit_or_create() {
        let role = Role::new("Clerk", DefaultPolicy::Deny);
        let id = role.id;
        let role = role.with_permission(
            Permission::for_type(id, "Invoice").grant(PermissionAction::Create),
        );

        assert!(!role.is_edit_allowed("Invoice").unwrap());
        assert!(role.is_field_edit_allowed("Invoice", "amount").unwrap());
    }

    #[test]
    fn test_field_view_does_not_fall_back_to_create() {
        let role = Role::new("Clerk", DefaultPolicy::Deny);
        let id = role.id;
        let role = role.with_permission(
            Permission::for_type(id, "Invoice").grant(PermissionAction::Create),
        );

        assert!(!role.is_field_view_allowed("Invoice", "amount").unwrap());
    }

    #[test]
    fn test_field_edit_record_skips_create_fallback() {
        let role = Role::new("Clerk", DefaultPolicy::Deny);
        let id = role.id;
        let role = role
            .with_permission(Permission::for_type(id, "Invoice").grant(PermissionAction::Create))
            .with_permission(Permission::for_field(id, "Invoice", "amount"));

        assert!(!role.is_field_edit_allowed("Invoice", "amount").unwrap());
    }

    #[test]
    fn test_duplicate_records_fail_every_query_on_scope() {
        let role = viewer();
        let id = role.id;
        let role = role.with_permission(Permission::for_type(id, "Invoice"));

        for action in PermissionAction::ALL {
            assert!(role.is_allowed(action, "Invoice").unwrap_err().is_integrity());
        }
        assert!(role.is_field_view_allowed("Invoice", "amount").unwrap_err().is_integrity());
        assert!(role.is_view_allowed("Customer").is_ok());
    }

    #[test]
    fn test_queries_are_repeatable() {
        let role = viewer();
        let first = role.is_field_edit_allowed("Invoice", "amount").unwrap();
        let second = role.is_field_edit_allowed("Invoice", "amount").unwrap();
        assert_eq!(first, second);
    }
}
