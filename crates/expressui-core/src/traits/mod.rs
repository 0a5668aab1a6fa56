//! Core traits defined in `expressui-core` and implemented by other crates.

pub mod repository;

pub use repository::Repository;
