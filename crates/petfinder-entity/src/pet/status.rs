//! Listing status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a pet listing.
///
/// `Lost`, `Found` and `Adoption` are open states a listing is created in.
/// `Finalized` is terminal and only reachable through resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// The owner lost the pet.
    Lost,
    /// Someone found a pet and is looking for the owner.
    Found,
    /// The pet is up for adoption.
    Adoption,
    /// The listing was resolved.
    Finalized,
}

impl PetStatus {
    /// Whether the listing still accepts sightings and can be resolved.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Finalized)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
            Self::Adoption => "adoption",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = petfinder_core::AppError;

    // The legacy web client still posts Portuguese status labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lost" | "perdido" => Ok(Self::Lost),
            "found" | "encontrado" => Ok(Self::Found),
            "adoption" | "adocao" | "adoção" => Ok(Self::Adoption),
            "finalized" | "finalizado" => Ok(Self::Finalized),
            _ => Err(petfinder_core::AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: lost, found, adoption"
            ))),
        }
    }
}
