//! Sighting entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A community report of a listed pet being seen.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sighting {
    /// Unique sighting identifier.
    pub id: Uuid,
    /// Listing the sighting refers to.
    pub pet_id: Uuid,
    /// Reporting user.
    pub user_id: Uuid,
    /// Latitude of the sighting.
    pub latitude: f64,
    /// Longitude of the sighting.
    pub longitude: f64,
    /// When the pet was seen.
    pub date_time: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// When the report was submitted.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a sighting.
#[derive(Debug, Clone)]
pub struct CreateSighting {
    /// Listing.
    pub pet_id: Uuid,
    /// Reporter.
    pub user_id: Uuid,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// When the pet was seen.
    pub date_time: DateTime<Utc>,
    /// Description.
    pub description: String,
}
