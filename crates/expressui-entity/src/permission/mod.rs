//! Permission domain entities.

pub mod action;
pub mod model;

pub use action::PermissionAction;
pub use model::Permission;
