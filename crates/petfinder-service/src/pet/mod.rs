//! Listings: creation, the public feed, details and "my pets".

pub mod service;
pub mod views;

pub use service::{CreatePetInput, PetService};
pub use views::{ContactCard, MyPetItem, PetDetails, PetListItem, PetRelation, SightingView, UserContact};
