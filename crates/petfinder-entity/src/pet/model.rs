//! Pet listing entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::size::PetSize;
use super::status::PetStatus;

/// A lost, found or adoption listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique listing identifier.
    pub id: Uuid,
    /// Owner (the account that created the listing).
    pub user_id: Uuid,
    /// Pet name, when known.
    pub name: Option<String>,
    /// Species (dog, cat, ...). Free text.
    pub species: String,
    /// Breed.
    pub breed: Option<String>,
    /// Coat color.
    pub color: Option<String>,
    /// Size class.
    pub size: Option<PetSize>,
    /// Free-text location where the pet was lost or found.
    pub location: String,
    /// Current lifecycle status.
    pub status: PetStatus,
    /// Contact information published with the listing.
    pub contact: Option<String>,
    /// Reward offered, free text.
    pub reward: Option<String>,
    /// Latitude of the reported location.
    pub latitude: Option<f64>,
    /// Longitude of the reported location.
    pub longitude: Option<f64>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the listing was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Latitude where the pet was finally found or handed over.
    pub final_latitude: Option<f64>,
    /// Longitude where the pet was finally found or handed over.
    pub final_longitude: Option<f64>,
    /// Registered account credited with finding or adopting the pet.
    pub found_by_user_id: Option<Uuid>,
    /// Name of a finder without an account.
    pub found_by_external: Option<String>,
}

impl Pet {
    /// Whether the given user owns this listing.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Display name used in notifications.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "your pet",
        }
    }
}

/// Data required to create a new listing.
#[derive(Debug, Clone)]
pub struct CreatePet {
    /// Owner.
    pub user_id: Uuid,
    /// Pet name.
    pub name: Option<String>,
    /// Species.
    pub species: String,
    /// Breed.
    pub breed: Option<String>,
    /// Coat color.
    pub color: Option<String>,
    /// Size class.
    pub size: Option<PetSize>,
    /// Free-text location.
    pub location: String,
    /// Initial status (never `Finalized`).
    pub status: PetStatus,
    /// Contact information.
    pub contact: Option<String>,
    /// Reward.
    pub reward: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
}

/// Resolution data written when a listing is finalized.
#[derive(Debug, Clone)]
pub struct ResolvePet {
    /// Latitude where the story ended.
    pub final_latitude: f64,
    /// Longitude where the story ended.
    pub final_longitude: f64,
    /// Registered finder, if any.
    pub found_by_user_id: Option<Uuid>,
    /// External finder name, cleared when a registered finder is linked.
    pub found_by_external: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back() {
        let now = Utc::now();
        let mut pet = Pet {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: Some("Rex".to_string()),
            species: "dog".to_string(),
            breed: None,
            color: None,
            size: Some(PetSize::Large),
            location: "Centro".to_string(),
            status: PetStatus::Lost,
            contact: None,
            reward: None,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            final_latitude: None,
            final_longitude: None,
            found_by_user_id: None,
            found_by_external: None,
        };
        assert_eq!(pet.display_name(), "Rex");
        pet.name = Some("  ".to_string());
        assert_eq!(pet.display_name(), "your pet");
        pet.name = None;
        assert_eq!(pet.display_name(), "your pet");

        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["status"], "lost");
        assert_eq!(json["size"], "large");
        assert!(json.get("foundByUserId").is_some());
    }
}
