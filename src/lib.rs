//! # expressui
//!
//! Role and field-level security for ExpressUI generated CRUD screens.
//!
//! This crate re-exports the workspace members so applications can depend
//! on a single crate:
//!
//! - [`expressui_core`]: errors, configuration, identifiers, and repository traits
//! - [`expressui_entity`]: roles, permissions, users, and role assignments
//! - [`expressui_store`]: the in-memory store, integrity rules, and seed files
//! - [`expressui_auth`]: permission resolution, enforcement, and authentication

pub use expressui_auth;
pub use expressui_core;
pub use expressui_entity;
pub use expressui_store;

pub use expressui_auth::{PermissionResolver, RbacEnforcer, SecuredUser, SecurityService};
pub use expressui_core::{AppError, AppResult};
pub use expressui_entity::{DefaultPolicy, Permission, PermissionAction, Role, User};
pub use expressui_store::MemoryStore;
