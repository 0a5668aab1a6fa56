//! User domain entities.

pub mod model;
pub mod user_role;

pub use model::User;
pub use user_role::UserRole;
