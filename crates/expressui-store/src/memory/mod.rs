//! In-memory security data store backed by `dashmap`.
//!
//! Roles own their permissions. Users and roles are linked through
//! `UserRole` records that either side's deletion removes.

pub mod roles;
pub mod users;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use expressui_core::result::AppResult;
use expressui_core::types::{RoleId, UserId};
use expressui_entity::role::Role;
use expressui_entity::user::{User, UserRole};

pub use roles::RoleRepository;
pub use users::UserRepository;

/// Shared tables behind every repository handle.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) roles: DashMap<RoleId, Role>,
    pub(crate) users: DashMap<UserId, User>,
    pub(crate) user_roles: DashMap<(UserId, RoleId), UserRole>,
    /// Serializes writes so uniqueness checks and inserts are atomic.
    pub(crate) write_lock: Mutex<()>,
}

/// Thread-safe in-memory store. Cloning shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) state: Arc<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository handle for roles and their permissions.
    pub fn roles(&self) -> RoleRepository {
        RoleRepository::new(Arc::clone(&self.state))
    }

    /// Repository handle for users and their role links.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(Arc::clone(&self.state))
    }

    /// Load a user and every role assigned to it.
    ///
    /// Each call copies the current rows, so the result reflects the
    /// latest committed data and stays stable while it is used.
    pub async fn load_user_with_roles(&self, login_name: &str) -> AppResult<Option<(User, Vec<Role>)>> {
        let users = self.users();
        let Some(user) = users.find_by_login_name(login_name).await? else {
            return Ok(None);
        };
        let roles = users.roles_for(&user.id).await?;
        debug!(login = %user.login_name, roles = roles.len(), "Loaded user snapshot");
        Ok(Some((user, roles)))
    }
}
