//! # petfinder-auth
//!
//! Authentication primitives for PetFinder.
//!
//! - `jwt`: bearer token issuing and verification (HMAC-SHA256)
//! - `password`: Argon2id hashing and password policy

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
