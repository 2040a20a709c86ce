//! Route handlers organized by domain.

pub mod account;
pub mod health;
pub mod notification;
pub mod pet;
pub mod profile;
pub mod resolution;
pub mod sighting;
pub mod upload;
