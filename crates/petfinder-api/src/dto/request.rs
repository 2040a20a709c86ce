//! Request DTOs with validation.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use validator::Validate;

use petfinder_core::result::AppResult;
use petfinder_core::types::pagination::{DEFAULT_PER_PAGE, PageRequest};
use petfinder_entity::pet::{PetFilter, PetStatus};
use petfinder_entity::user::UpdateProfile;
use petfinder_service::{CreateSightingInput, RegisterInput, ResolveInput};

/// POST /users
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(max = 120, message = "Name is too long"))]
    pub name: String,
    /// Login email.
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,
    /// Password.
    pub password: String,
    /// Password, typed again.
    pub confirm_password: String,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        }
    }
}

/// POST /login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// PUT /profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Display name.
    #[validate(length(max = 120, message = "Name is too long"))]
    pub name: Option<String>,
    /// Contact phone.
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    /// City.
    #[validate(length(max = 120))]
    pub city: Option<String>,
    /// State or region.
    #[validate(length(max = 120))]
    pub state: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            city: req.city,
            state: req.state,
        }
    }
}

/// POST /pets/{id}/sightings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSightingRequest {
    /// Where the pet was seen.
    pub latitude: f64,
    /// Where the pet was seen.
    pub longitude: f64,
    /// When the pet was seen.
    pub date_time: String,
    /// What the reporter saw.
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: String,
}

impl From<CreateSightingRequest> for CreateSightingInput {
    fn from(req: CreateSightingRequest) -> Self {
        Self {
            latitude: req.latitude,
            longitude: req.longitude,
            date_time: req.date_time,
            description: req.description,
        }
    }
}

/// PATCH /pets/{id}/resolve
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePetRequest {
    /// Where the story ended.
    pub final_latitude: f64,
    /// Where the story ended.
    pub final_longitude: f64,
    /// Email of a registered finder.
    #[validate(length(max = 254))]
    pub finder_email: Option<String>,
    /// Name of a finder without an account.
    #[validate(length(max = 120, message = "Finder name is too long"))]
    pub found_by_external: Option<String>,
}

impl From<ResolvePetRequest> for ResolveInput {
    fn from(req: ResolvePetRequest) -> Self {
        Self {
            final_latitude: req.final_latitude,
            final_longitude: req.final_longitude,
            finder_email: req.finder_email,
            found_by_external: req.found_by_external,
        }
    }
}

/// Query string of GET /pets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Status filter (`lost`, `found`, `adoption`).
    pub status: Option<String>,
    /// Species filter.
    pub species: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    #[serde(alias = "perPage")]
    pub per_page: Option<u64>,
}

impl FeedQuery {
    /// Split into the feed filter and page.
    pub fn into_parts(self) -> AppResult<(PetFilter, PageRequest)> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PetStatus>()?),
        };
        let page = PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        );
        Ok((PetFilter::new(status, self.species, self.search), page))
    }
}
