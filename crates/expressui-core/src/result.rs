//! Convenience result type alias for ExpressUI.

use crate::error::AppError;

/// A specialized `Result` type for ExpressUI operations.
pub type AppResult<T> = Result<T, AppError>;
