//! Convenience result type alias for Quill.

use crate::error::AppError;

/// A specialized `Result` type for host-level operations.
pub type AppResult<T> = Result<T, AppError>;
