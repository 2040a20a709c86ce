//! # petfinder-entity
//!
//! Domain entity models for PetFinder. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! derive `sqlx::FromRow` and serialize with camelCase keys.

pub mod notification;
pub mod pet;
pub mod sighting;
pub mod user;
