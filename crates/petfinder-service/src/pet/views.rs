//! Response shapes that join listings with images, people and sightings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petfinder_entity::pet::{Pet, PetImage};
use petfinder_entity::sighting::Sighting;
use petfinder_entity::user::User;

/// Name and phone of a person attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    /// Display name.
    pub name: String,
    /// Phone, if the user shared one.
    pub phone: Option<String>,
}

impl From<&User> for ContactCard {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Full public contact of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContact {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: Option<String>,
}

impl From<&User> for UserContact {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// One entry of the public feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetListItem {
    /// The listing.
    #[serde(flatten)]
    pub pet: Pet,
    /// Its photos.
    pub images: Vec<PetImage>,
    /// Who posted it.
    pub owner: Option<ContactCard>,
}

/// A listing with everything the detail page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetails {
    /// The listing.
    #[serde(flatten)]
    pub pet: Pet,
    /// Its photos.
    pub images: Vec<PetImage>,
    /// Who posted it.
    pub owner: Option<UserContact>,
    /// Sightings, most recent first.
    pub sightings: Vec<SightingView>,
}

/// A sighting with its reporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingView {
    /// The sighting.
    #[serde(flatten)]
    pub sighting: Sighting,
    /// Who reported it.
    pub reporter: Option<UserContact>,
}

/// How the requesting user relates to a listing in "my pets".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetRelation {
    /// The user posted the listing.
    Owner,
    /// The user was credited with finding the pet.
    Finder,
}

/// One entry of the "my pets" page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPetItem {
    /// The listing.
    #[serde(flatten)]
    pub pet: Pet,
    /// Its photos.
    pub images: Vec<PetImage>,
    /// Owner or finder.
    pub relation: PetRelation,
    /// Credited finder, on the user's own listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finder: Option<ContactCard>,
    /// Listing owner, on listings the user found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ContactCard>,
}

/// Group images by listing, keeping their order.
pub(crate) fn images_by_pet(images: Vec<PetImage>) -> HashMap<Uuid, Vec<PetImage>> {
    let mut grouped: HashMap<Uuid, Vec<PetImage>> = HashMap::new();
    for image in images {
        grouped.entry(image.pet_id).or_default().push(image);
    }
    grouped
}

/// Index users by ID.
pub(crate) fn users_by_id(users: Vec<User>) -> HashMap<Uuid, User> {
    users.into_iter().map(|u| (u.id, u)).collect()
}
