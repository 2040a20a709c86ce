//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered PetFinder account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, unique ignoring case.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Contact phone shown on listings.
    pub phone: Option<String>,
    /// City of residence.
    pub city: Option<String>,
    /// State or region of residence.
    pub state: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Editable profile fields. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    /// New display name.
    pub name: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New state.
    pub state: Option<String>,
}

impl UpdateProfile {
    /// Apply the changes to a user row in place.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(city) = &self.city {
            user.city = Some(city.clone());
        }
        if let Some(state) = &self.state {
            user.state = Some(state.clone());
        }
    }
}
