//! Listing image model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A photo attached to a listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PetImage {
    /// Unique image identifier.
    pub id: Uuid,
    /// Listing this image belongs to.
    pub pet_id: Uuid,
    /// Public URL of the image.
    pub url: String,
    /// Key of the object in the storage provider.
    #[serde(skip_serializing, default)]
    pub storage_key: String,
    /// When the image was attached.
    pub created_at: DateTime<Utc>,
}

/// An image that has been stored but not yet recorded.
#[derive(Debug, Clone)]
pub struct NewPetImage {
    /// Public URL.
    pub url: String,
    /// Storage key.
    pub storage_key: String,
}
