//! RBAC enforcement: turns resolver answers into allow/deny outcomes for
//! screens and actions.

use tracing::debug;

use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_entity::permission::PermissionAction;

use super::resolver::PermissionResolver;

/// Enforces entity and field permissions for any [`PermissionResolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Checks an action on a whole entity type.
    pub fn check<P>(&self, principal: &P, action: PermissionAction, entity_type: &str) -> AppResult<bool>
    where
        P: PermissionResolver + ?Sized,
    {
        let allowed = principal.is_allowed(action, entity_type)?;
        debug!(
            principal = principal.principal_name(),
            %action,
            entity_type,
            allowed,
            "Entity permission check"
        );
        Ok(allowed)
    }

    /// Checks an action on one field of an entity type.
    ///
    /// Only `View` and `Edit` exist at field scope; other actions are a
    /// validation error.
    pub fn check_field<P>(
        &self,
        principal: &P,
        action: PermissionAction,
        entity_type: &str,
        field: &str,
    ) -> AppResult<bool>
    where
        P: PermissionResolver + ?Sized,
    {
        let allowed = match action {
            PermissionAction::View => principal.is_field_view_allowed(entity_type, field)?,
            PermissionAction::Edit => principal.is_field_edit_allowed(entity_type, field)?,
            PermissionAction::Create | PermissionAction::Delete => {
                return Err(AppError::validation(format!(
                    "Action '{action}' applies to whole entities, not to field '{entity_type}.{field}'"
                )));
            }
        };
        debug!(
            principal = principal.principal_name(),
            %action,
            entity_type,
            field,
            allowed,
            "Field permission check"
        );
        Ok(allowed)
    }

    /// Returns `Ok(())` if allowed, or an `Authorization` error if denied.
    pub fn require<P>(&self, principal: &P, action: PermissionAction, entity_type: &str) -> AppResult<()>
    where
        P: PermissionResolver + ?Sized,
    {
        if self.check(principal, action, entity_type)? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "'{}' may not {action} '{entity_type}'",
                principal.principal_name()
            )))
        }
    }

    /// Field-scoped variant of [`RbacEnforcer::require`].
    pub fn require_field<P>(
        &self,
        principal: &P,
        action: PermissionAction,
        entity_type: &str,
        field: &str,
    ) -> AppResult<()>
    where
        P: PermissionResolver + ?Sized,
    {
        if self.check_field(principal, action, entity_type, field)? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "'{}' may not {action} '{entity_type}.{field}'",
                principal.principal_name()
            )))
        }
    }

    /// Keeps the fields the principal may perform `action` on, in input order.
    ///
    /// Generated forms use this to hide unviewable fields and make
    /// uneditable ones read-only.
    pub fn permitted_fields<'f, P>(
        &self,
        principal: &P,
        action: PermissionAction,
        entity_type: &str,
        fields: &[&'f str],
    ) -> AppResult<Vec<&'f str>>
    where
        P: PermissionResolver + ?Sized,
    {
        let mut permitted = Vec::with_capacity(fields.len());
        for field in fields {
            if self.check_field(principal, action, entity_type, field)? {
                permitted.push(*field);
            }
        }
        Ok(permitted)
    }
}
