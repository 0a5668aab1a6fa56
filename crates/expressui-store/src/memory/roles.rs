//! Role repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_core::traits::Repository;
use expressui_core::types::{PermissionId, RoleId};
use expressui_entity::permission::Permission;
use expressui_entity::role::Role;
use expressui_entity::validation::validate_entity;

use super::StoreState;
use crate::integrity::PermissionValidator;

/// Repository for roles and the permissions they own.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    state: Arc<StoreState>,
    validator: PermissionValidator,
}

impl RoleRepository {
    pub(crate) fn new(state: Arc<StoreState>) -> Self {
        Self {
            state,
            validator: PermissionValidator::new(),
        }
    }

    /// Find a role by its unique name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .roles
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value().clone()))
    }

    /// Find a role by name, failing with `NotFound` when absent.
    pub async fn get_by_name(&self, name: &str) -> AppResult<Role> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role '{name}' not found")))
    }

    /// Insert or replace one permission record on a role.
    ///
    /// A record whose id is already on the role replaces it. A record for a
    /// scope the role already covers under another id is rejected.
    pub async fn save_permission(
        &self,
        role_id: &RoleId,
        permission: Permission,
    ) -> AppResult<Permission> {
        validate_entity(&permission)?;
        let _guard = self.state.write_lock.lock().await;

        let mut role = self
            .state
            .roles
            .get_mut(role_id)
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;

        let mut permission = permission;
        permission.role_id = *role_id;
        self.validator.validate(&role, &permission)?;

        match role.permissions.iter_mut().find(|p| p.id == permission.id) {
            Some(existing) => *existing = permission.clone(),
            None => role.permissions.push(permission.clone()),
        }
        role.updated_at = Utc::now();

        debug!(role = %role.name, scope = %permission.scope_label(), "Saved permission");
        Ok(permission)
    }

    /// Remove one permission record. Returns `true` if it existed.
    pub async fn remove_permission(
        &self,
        role_id: &RoleId,
        permission_id: &PermissionId,
    ) -> AppResult<bool> {
        let _guard = self.state.write_lock.lock().await;

        let mut role = self
            .state
            .roles
            .get_mut(role_id)
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;

        let before = role.permissions.len();
        role.permissions.retain(|p| p.id != *permission_id);
        let removed = role.permissions.len() != before;
        if removed {
            role.updated_at = Utc::now();
        }
        Ok(removed)
    }
}

#[async_trait]
impl Repository<Role, RoleId> for RoleRepository {
    async fn find_by_id(&self, id: &RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.roles.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .state
            .roles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    /// Validates the role, its name uniqueness, and permission scope
    /// uniqueness before storing it. Permissions are re-homed to the role.
    async fn save(&self, role: Role) -> AppResult<Role> {
        let mut role = role;
        for perm in &mut role.permissions {
            perm.role_id = role.id;
        }
        validate_entity(&role)?;
        self.validator.require_unique(&role)?;

        let _guard = self.state.write_lock.lock().await;

        let name_taken = self
            .state
            .roles
            .iter()
            .any(|entry| entry.id != role.id && entry.name == role.name);
        if name_taken {
            return Err(AppError::conflict(format!(
                "Role name '{}' is already in use",
                role.name
            )));
        }

        role.updated_at = Utc::now();
        self.state.roles.insert(role.id, role.clone());
        info!(role = %role.name, permissions = role.permissions.len(), "Saved role");
        Ok(role)
    }

    /// Deletes the role with its permissions and every user link to it.
    async fn delete(&self, id: &RoleId) -> AppResult<bool> {
        let _guard = self.state.write_lock.lock().await;

        let Some((_, role)) = self.state.roles.remove(id) else {
            return Ok(false);
        };
        let links_before = self.state.user_roles.len();
        self.state.user_roles.retain(|(_, role_id), _| role_id != id);
        let links_removed = links_before - self.state.user_roles.len();

        info!(
            role = %role.name,
            permissions = role.permissions.len(),
            links_removed,
            "Deleted role"
        );
        Ok(true)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.state.roles.len() as u64)
    }
}
