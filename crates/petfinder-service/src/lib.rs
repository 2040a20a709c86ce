//! # petfinder-service
//!
//! Business logic for PetFinder. Each service turns one use case into a
//! handful of repository, cache and storage calls.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time as `Arc` trait objects or cheap clones.

pub mod account;
pub mod context;
pub mod notification;
pub mod pet;
pub mod profile;
pub mod resolution;
pub mod sighting;
pub mod upload;
pub(crate) mod validation;

pub use account::{AccountService, LoginSession, RegisterInput};
pub use context::RequestContext;
pub use notification::NotificationService;
pub use pet::{CreatePetInput, PetService};
pub use profile::ProfileService;
pub use resolution::{ResolutionService, ResolveInput};
pub use sighting::{CreateSightingInput, SightingService};
pub use upload::UploadService;
