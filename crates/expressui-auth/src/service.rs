//! Login, principal loading, user creation, and role assignment.
//!
//! The service is constructed with its store and configuration and passed
//! to whoever needs it; nothing here is reachable through global state.

use tracing::{error, info, warn};

use expressui_core::config::SecurityConfig;
use expressui_core::error::AppError;
use expressui_core::result::AppResult;
use expressui_core::traits::Repository;
use expressui_entity::user::User;
use expressui_store::MemoryStore;

use crate::password::{PasswordHasher, PasswordValidator};
use crate::principal::SecuredUser;
use crate::rbac::RbacEnforcer;

const INVALID_CREDENTIALS: &str = "Invalid login name or password";

/// Well-formed Argon2id hash with default parameters that no password
/// matches. Verified against on unknown logins so they cost as much as
/// known ones.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$ZXhwcmVzc3VpLWR1bW15IQ$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

/// Entry point for authentication and user/role administration.
#[derive(Debug, Clone)]
pub struct SecurityService {
    store: MemoryStore,
    hasher: PasswordHasher,
    password_validator: PasswordValidator,
    enforcer: RbacEnforcer,
}

impl SecurityService {
    /// Creates a new security service over a store.
    pub fn new(store: MemoryStore, config: &SecurityConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            password_validator: PasswordValidator::new(config),
            enforcer: RbacEnforcer::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// The enforcer used for permission checks.
    pub fn enforcer(&self) -> &RbacEnforcer {
        &self.enforcer
    }

    /// Verifies credentials and returns the user's current snapshot.
    ///
    /// Unknown logins and wrong passwords share one message. Account state
    /// is reported only after the password matches.
    pub async fn authenticate(&self, login_name: &str, password: &str) -> AppResult<SecuredUser> {
        let Some((user, roles)) = self.store.load_user_with_roles(login_name).await? else {
            self.password_matches(login_name, password, DUMMY_HASH);
            warn!(login = login_name, "Login failed: unknown user");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.password_matches(&user.login_name, password, &user.password_hash) {
            warn!(login = %user.login_name, "Login failed: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if let Some(reason) = user.login_blocker() {
            warn!(login = %user.login_name, reason, "Login refused");
            return Err(AppError::authentication(reason));
        }

        info!(login = %user.login_name, roles = roles.len(), "User logged in");
        Ok(SecuredUser::new(user, roles))
    }

    /// Loads the latest snapshot of a user and its roles.
    pub async fn load_principal(&self, login_name: &str) -> AppResult<SecuredUser> {
        self.store
            .load_user_with_roles(login_name)
            .await?
            .map(|(user, roles)| SecuredUser::new(user, roles))
            .ok_or_else(|| AppError::not_found(format!("User '{login_name}' not found")))
    }

    /// Creates an enabled user after checking the password policy.
    pub async fn create_user(&self, login_name: &str, password: &str) -> AppResult<User> {
        self.password_validator.validate(password)?;
        let hash = self.hasher.hash_password(password)?;
        self.store.users().save(User::new(login_name, hash)).await
    }

    /// Replaces a user's password after verifying the current one.
    ///
    /// Clears an expired-credentials flag.
    pub async fn change_password(
        &self,
        login_name: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let users = self.store.users();
        let mut user = users.get_by_login_name(login_name).await?;

        if !self.password_matches(&user.login_name, current_password, &user.password_hash) {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }
        self.password_validator
            .validate_not_same(current_password, new_password)?;
        self.password_validator.validate(new_password)?;

        user.password_hash = self.hasher.hash_password(new_password)?;
        user.credentials_expired = false;
        users.save(user).await?;
        info!(login = login_name, "Password changed");
        Ok(())
    }

    /// Checks a password against a stored hash. An unreadable hash counts
    /// as a mismatch so callers cannot tell it apart from a wrong password.
    fn password_matches(&self, login_name: &str, password: &str, hash: &str) -> bool {
        match self.hasher.verify_password(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!(login = login_name, error = %e, "Stored password hash is unreadable");
                false
            }
        }
    }

    /// Grants a role to a user by name. Returns `false` if already granted.
    pub async fn assign_role(&self, login_name: &str, role_name: &str) -> AppResult<bool> {
        let user = self.store.users().get_by_login_name(login_name).await?;
        let role = self.store.roles().get_by_name(role_name).await?;
        self.store.users().assign_role(&user.id, &role.id).await
    }

    /// Revokes a role from a user by name. Returns `true` if it was granted.
    pub async fn unassign_role(&self, login_name: &str, role_name: &str) -> AppResult<bool> {
        let user = self.store.users().get_by_login_name(login_name).await?;
        let role = self.store.roles().get_by_name(role_name).await?;
        self.store.users().unassign_role(&user.id, &role.id).await
    }
}
