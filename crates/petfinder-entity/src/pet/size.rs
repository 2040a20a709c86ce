//! Pet size enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rough size class of the animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_size", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    /// Small.
    Small,
    /// Medium.
    Medium,
    /// Large.
    Large,
}

impl PetSize {
    /// Return the size as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for PetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PetSize {
    type Err = petfinder_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "pequeno" => Ok(Self::Small),
            "medium" | "medio" | "médio" => Ok(Self::Medium),
            "large" | "grande" => Ok(Self::Large),
            _ => Err(petfinder_core::AppError::validation(format!(
                "Invalid size: '{s}'. Expected one of: small, medium, large"
            ))),
        }
    }
}
