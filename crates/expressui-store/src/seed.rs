//! JSON seed files for roles, permissions, and users.
//!
//! ```json
//! {
//!   "roles": [
//!     { "name": "Viewer", "default_policy": "DENY",
//!       "permissions": [ { "entity_type": "Invoice", "view": true } ] }
//!   ],
//!   "users": [ { "login_name": "alice", "password_hash": "<output of expressui hash-password>", "roles": ["Viewer"] } ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use argon2::password_hash::PasswordHash;
use tracing::{info, warn};

use expressui_core::error::{AppError, ErrorKind};
use expressui_core::result::AppResult;
use expressui_core::traits::Repository;
use expressui_entity::permission::{Permission, PermissionAction};
use expressui_entity::role::{DefaultPolicy, Role};
use expressui_entity::user::User;
use expressui_entity::validation::validate_entity;

use crate::integrity::PermissionValidator;
use crate::memory::MemoryStore;

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Roles with their permissions.
    #[serde(default)]
    pub roles: Vec<RoleSeed>,
    /// Users with the names of their roles.
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// A role entry in a seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSeed {
    /// Role name.
    pub name: String,
    /// `ALLOW` or `DENY`.
    pub default_policy: DefaultPolicy,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Permission records.
    #[serde(default)]
    pub permissions: Vec<PermissionSeed>,
}

/// A permission entry in a seed file. Omitted flags are `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSeed {
    /// Entity type name.
    pub entity_type: String,
    /// Field name, omitted for a type-level rule.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub edit: bool,
    #[serde(default)]
    pub delete: bool,
}

/// A user entry in a seed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeed {
    /// Login name.
    pub login_name: String,
    /// Argon2 PHC string.
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub account_expired: bool,
    #[serde(default)]
    pub account_locked: bool,
    #[serde(default)]
    pub credentials_expired: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Names of the roles assigned to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A problem found while auditing a seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedIssue {
    /// The role or user the problem belongs to.
    pub subject: String,
    /// What is wrong.
    pub message: String,
}

fn default_true() -> bool {
    true
}

impl RoleSeed {
    /// Build the role entity with its permissions.
    pub fn to_role(&self) -> Role {
        let mut role = Role::new(self.name.clone(), self.default_policy);
        if let Some(description) = &self.description {
            role = role.with_description(description.clone());
        }
        for seed in &self.permissions {
            let perm = match &seed.field {
                Some(field) => Permission::for_field(role.id, seed.entity_type.clone(), field.clone()),
                None => Permission::for_type(role.id, seed.entity_type.clone()),
            };
            role = role.with_permission(
                perm.with(PermissionAction::View, seed.view)
                    .with(PermissionAction::Create, seed.create)
                    .with(PermissionAction::Edit, seed.edit)
                    .with(PermissionAction::Delete, seed.delete),
            );
        }
        role
    }
}

impl UserSeed {
    /// Build the user entity (role links are created separately).
    pub fn to_user(&self) -> User {
        let mut user = User::new(self.login_name.clone(), self.password_hash.clone());
        user.account_expired = self.account_expired;
        user.account_locked = self.account_locked;
        user.credentials_expired = self.credentials_expired;
        user.enabled = self.enabled;
        user
    }
}

impl SeedData {
    /// Read a seed file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read seed file '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    /// Parse seed JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Collect every problem that would make [`MemoryStore::from_seed`] fail,
    /// without stopping at the first one.
    pub fn audit(&self) -> Vec<SeedIssue> {
        let validator = PermissionValidator::new();
        let mut issues = Vec::new();

        for (index, seed) in self.roles.iter().enumerate() {
            let role = seed.to_role();
            if let Err(e) = validate_entity(&role) {
                issues.push(SeedIssue {
                    subject: format!("role '{}'", seed.name),
                    message: e.message,
                });
            }
            for dup in validator.audit(&role) {
                let scope = match &dup.field {
                    Some(field) => format!("{}.{field}", dup.entity_type),
                    None => dup.entity_type.clone(),
                };
                issues.push(SeedIssue {
                    subject: format!("role '{}'", seed.name),
                    message: format!("{} permission records for '{scope}'", dup.count),
                });
            }
            if self.roles[..index].iter().any(|r| r.name == seed.name) {
                issues.push(SeedIssue {
                    subject: format!("role '{}'", seed.name),
                    message: "Role name is defined more than once".to_string(),
                });
            }
        }

        for (index, seed) in self.users.iter().enumerate() {
            if let Err(e) = validate_entity(&seed.to_user()) {
                issues.push(SeedIssue {
                    subject: format!("user '{}'", seed.login_name),
                    message: e.message,
                });
            }
            if self.users[..index]
                .iter()
                .any(|u| u.login_name.eq_ignore_ascii_case(&seed.login_name))
            {
                issues.push(SeedIssue {
                    subject: format!("user '{}'", seed.login_name),
                    message: "Login name is defined more than once".to_string(),
                });
            }
            if !seed.password_hash.is_empty() {
                if let Err(e) = PasswordHash::new(&seed.password_hash) {
                    issues.push(SeedIssue {
                        subject: format!("user '{}'", seed.login_name),
                        message: format!("Password hash is unreadable: {e}"),
                    });
                }
            }
            for role_name in &seed.roles {
                if !self.roles.iter().any(|r| &r.name == role_name) {
                    issues.push(SeedIssue {
                        subject: format!("user '{}'", seed.login_name),
                        message: format!("Unknown role '{role_name}'"),
                    });
                }
            }
        }

        issues
    }
}

impl MemoryStore {
    /// Build a store from seed data. Any invalid record rejects the seed.
    pub async fn from_seed(seed: &SeedData) -> AppResult<Self> {
        let store = Self::new();
        store.import_seed(seed).await?;
        Ok(store)
    }

    /// Add seed roles, users, and role links to this store.
    ///
    /// All or nothing: the seed is audited and built in a staging store
    /// first, then copied in under the write lock. On any error this
    /// store is left untouched.
    pub async fn import_seed(&self, seed: &SeedData) -> AppResult<()> {
        let issues = seed.audit();
        if let Some(first) = issues.first() {
            warn!(problems = issues.len(), "Rejected security seed");
            return Err(AppError::validation(format!(
                "Seed has {} problem(s); first: {}: {}",
                issues.len(),
                first.subject,
                first.message
            )));
        }

        let staged = Self::new();
        staged.write_seed(seed).await?;
        self.absorb(&staged).await?;

        info!(
            roles = seed.roles.len(),
            users = seed.users.len(),
            "Imported security seed"
        );
        Ok(())
    }

    async fn write_seed(&self, seed: &SeedData) -> AppResult<()> {
        let roles = self.roles();
        let users = self.users();

        for role_seed in &seed.roles {
            roles.save(role_seed.to_role()).await?;
        }

        for user_seed in &seed.users {
            let user = users.save(user_seed.to_user()).await?;
            for role_name in &user_seed.roles {
                let role = roles.get_by_name(role_name).await?;
                users.assign_role(&user.id, &role.id).await?;
            }
        }
        Ok(())
    }

    /// Copy every row of `staged` into this store, refusing role names or
    /// login names that are already taken.
    async fn absorb(&self, staged: &MemoryStore) -> AppResult<()> {
        let _guard = self.state.write_lock.lock().await;

        for role in staged.state.roles.iter() {
            if self.state.roles.iter().any(|existing| existing.name == role.name) {
                return Err(AppError::conflict(format!(
                    "Role name '{}' is already in use",
                    role.name
                )));
            }
        }
        for user in staged.state.users.iter() {
            let taken = self
                .state
                .users
                .iter()
                .any(|existing| existing.login_name.eq_ignore_ascii_case(&user.login_name));
            if taken {
                return Err(AppError::conflict(format!(
                    "Login name '{}' is already in use",
                    user.login_name
                )));
            }
        }

        for role in staged.state.roles.iter() {
            self.state.roles.insert(*role.key(), role.value().clone());
        }
        for user in staged.state.users.iter() {
            self.state.users.insert(*user.key(), user.value().clone());
        }
        for link in staged.state.user_roles.iter() {
            self.state.user_roles.insert(*link.key(), link.value().clone());
        }
        Ok(())
    }
}
