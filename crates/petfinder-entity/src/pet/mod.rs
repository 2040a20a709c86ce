//! Pet listing entity, its images, and listing filters.

pub mod filter;
pub mod image;
pub mod model;
pub mod size;
pub mod status;

pub use filter::PetFilter;
pub use image::{NewPetImage, PetImage};
pub use model::{CreatePet, Pet, ResolvePet};
pub use size::PetSize;
pub use status::PetStatus;
