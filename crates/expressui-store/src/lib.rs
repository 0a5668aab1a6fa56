//! # expressui-store
//!
//! The persistence collaborator for ExpressUI security data.
//!
//! ## Modules
//!
//! - `memory`: thread-safe in-memory role and user repositories with
//!   ownership cascades
//! - `integrity`: permission scope uniqueness rules
//! - `seed`: JSON seed files for roles, permissions, and users

pub mod integrity;
pub mod memory;
pub mod seed;

pub use integrity::{DuplicateScope, PermissionValidator};
pub use memory::{MemoryStore, RoleRepository, UserRepository};
pub use seed::{SeedData, SeedIssue};
