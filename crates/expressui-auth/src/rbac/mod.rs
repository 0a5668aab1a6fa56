//! Role-based access control over entity types and fields.

pub mod enforcer;
pub mod resolver;

pub use enforcer::RbacEnforcer;
pub use resolver::PermissionResolver;
