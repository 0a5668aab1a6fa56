//! User repository and role assignment.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_core::traits::Repository;
use expressui_core::types::{RoleId, UserId};
use expressui_entity::role::Role;
use expressui_entity::user::{User, UserRole};
use expressui_entity::validation::validate_entity;

use super::StoreState;

/// Repository for users and their role links.
#[derive(Debug, Clone)]
pub struct UserRepository {
    state: Arc<StoreState>,
}

impl UserRepository {
    pub(crate) fn new(state: Arc<StoreState>) -> Self {
        Self { state }
    }

    /// Find a user by login name (case-insensitive).
    pub async fn find_by_login_name(&self, login_name: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .users
            .iter()
            .find(|entry| entry.login_name.eq_ignore_ascii_case(login_name))
            .map(|entry| entry.value().clone()))
    }

    /// Find a user by login name, failing with `NotFound` when absent.
    pub async fn get_by_login_name(&self, login_name: &str) -> AppResult<User> {
        self.find_by_login_name(login_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{login_name}' not found")))
    }

    /// Grant a role to a user. Returns `false` if it was already granted.
    pub async fn assign_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<bool> {
        let _guard = self.state.write_lock.lock().await;

        if !self.state.users.contains_key(user_id) {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        if !self.state.roles.contains_key(role_id) {
            return Err(AppError::not_found(format!("Role {role_id} not found")));
        }

        let link = UserRole::new(*user_id, *role_id);
        if self.state.user_roles.contains_key(&link.key()) {
            return Ok(false);
        }
        self.state.user_roles.insert(link.key(), link);
        info!(user_id = %user_id, role_id = %role_id, "Assigned role");
        Ok(true)
    }

    /// Revoke a role from a user. Returns `true` if it was granted.
    pub async fn unassign_role(&self, user_id: &UserId, role_id: &RoleId) -> AppResult<bool> {
        let _guard = self.state.write_lock.lock().await;

        let removed = self
            .state
            .user_roles
            .remove(&(*user_id, *role_id))
            .is_some();
        if removed {
            info!(user_id = %user_id, role_id = %role_id, "Unassigned role");
        }
        Ok(removed)
    }

    /// Every role assigned to a user, ordered by name.
    pub async fn roles_for(&self, user_id: &UserId) -> AppResult<Vec<Role>> {
        let role_ids: Vec<RoleId> = self
            .state
            .user_roles
            .iter()
            .filter(|entry| entry.user_id == *user_id)
            .map(|entry| entry.role_id)
            .collect();

        let mut roles: Vec<Role> = role_ids
            .iter()
            .filter_map(|id| self.state.roles.get(id).map(|entry| entry.value().clone()))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    /// Every user holding a role, ordered by login name.
    pub async fn users_in_role(&self, role_id: &RoleId) -> AppResult<Vec<User>> {
        let user_ids: Vec<UserId> = self
            .state
            .user_roles
            .iter()
            .filter(|entry| entry.role_id == *role_id)
            .map(|entry| entry.user_id)
            .collect();

        let mut users: Vec<User> = user_ids
            .iter()
            .filter_map(|id| self.state.users.get(id).map(|entry| entry.value().clone()))
            .collect();
        users.sort_by(|a, b| a.login_name.cmp(&b.login_name));
        Ok(users)
    }
}

#[async_trait]
impl Repository<User, UserId> for UserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.state.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .state
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| a.login_name.cmp(&b.login_name));
        Ok(users)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        validate_entity(&user)?;
        let _guard = self.state.write_lock.lock().await;

        let login_taken = self.state.users.iter().any(|entry| {
            entry.id != user.id && entry.login_name.eq_ignore_ascii_case(&user.login_name)
        });
        if login_taken {
            return Err(AppError::conflict(format!(
                "Login name '{}' is already in use",
                user.login_name
            )));
        }

        let mut user = user;
        user.updated_at = Utc::now();
        self.state.users.insert(user.id, user.clone());
        info!(login = %user.login_name, "Saved user");
        Ok(user)
    }

    /// Deletes the user and its role links. Roles are untouched.
    async fn delete(&self, id: &UserId) -> AppResult<bool> {
        let _guard = self.state.write_lock.lock().await;

        let Some((_, user)) = self.state.users.remove(id) else {
            return Ok(false);
        };
        self.state.user_roles.retain(|(user_id, _), _| user_id != id);
        info!(login = %user.login_name, "Deleted user");
        Ok(true)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.state.users.len() as u64)
    }
}
