//! Convenience result type alias for PetFinder.

use crate::error::AppError;

/// A specialized `Result` type for PetFinder operations.
pub type AppResult<T> = Result<T, AppError>;
