//! # expressui-auth
//!
//! Authorization and authentication for ExpressUI security data.
//!
//! ## Modules
//!
//! - `rbac`: role-level permission resolution and enforcement
//! - `principal`: a user snapshot whose permissions are the union of its roles
//! - `password`: Argon2id password hashing and policy enforcement
//! - `service`: login, principal loading, and role assignment

pub mod password;
pub mod principal;
pub mod rbac;
pub mod service;

pub use password::{PasswordHasher, PasswordValidator};
pub use principal::SecuredUser;
pub use rbac::{PermissionResolver, RbacEnforcer};
pub use service::SecurityService;
