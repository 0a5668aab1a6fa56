//! # expressui-entity
//!
//! Security entity models for ExpressUI. A [`role::Role`] owns its
//! [`permission::Permission`] records; a [`user::User`] is linked to roles
//! through [`user::UserRole`] join records. Entities carry their
//! constraints as `validator` derives rather than relying on the store.

pub mod permission;
pub mod role;
pub mod user;
pub mod validation;

pub use permission::{Permission, PermissionAction};
pub use role::{DefaultPolicy, Role};
pub use user::{User, UserRole};
