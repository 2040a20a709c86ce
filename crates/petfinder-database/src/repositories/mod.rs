//! Repository traits and their PostgreSQL implementations.

pub mod notification;
pub mod pet;
pub mod sighting;
pub mod user;

pub use notification::{NotificationRepository, PgNotificationRepository};
pub use pet::{PetRepository, PgPetRepository};
pub use sighting::{PgSightingRepository, SightingRepository};
pub use user::{PgUserRepository, UserRepository};

use petfinder_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error with context.
pub(crate) fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}
