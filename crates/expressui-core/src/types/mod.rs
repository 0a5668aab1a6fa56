//! Core type definitions used across the ExpressUI workspace.

pub mod id;

pub use id::*;
