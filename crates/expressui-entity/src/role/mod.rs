//! Role domain entities.

pub mod model;
pub mod policy;

pub use model::Role;
pub use policy::DefaultPolicy;
