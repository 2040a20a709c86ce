//! Sighting reports and the owner notification they trigger.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_database::repositories::{
    NotificationRepository, PetRepository, SightingRepository,
};
use petfinder_entity::notification::CreateNotification;
use petfinder_entity::sighting::{CreateSighting, Sighting};

use crate::context::RequestContext;
use crate::validation;

/// Naive formats accepted for `dateTime`, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// A sighting report as submitted.
#[derive(Debug, Clone)]
pub struct CreateSightingInput {
    /// Where the pet was seen.
    pub latitude: f64,
    /// Where the pet was seen.
    pub longitude: f64,
    /// When the pet was seen, RFC 3339 or naive UTC.
    pub date_time: String,
    /// What the reporter saw.
    pub description: String,
}

/// Records sightings.
#[derive(Debug, Clone)]
pub struct SightingService {
    pets: Arc<dyn PetRepository>,
    sightings: Arc<dyn SightingRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl SightingService {
    /// Creates a new sighting service.
    pub fn new(
        pets: Arc<dyn PetRepository>,
        sightings: Arc<dyn SightingRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            pets,
            sightings,
            notifications,
        }
    }

    /// Records a sighting and tells the owner about it.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        pet_id: Uuid,
        input: CreateSightingInput,
    ) -> AppResult<Sighting> {
        let date_time = parse_date_time(&input.date_time)?;
        if date_time > Utc::now() {
            return Err(AppError::validation("Sighting date cannot be in the future"));
        }
        let description = validation::required(&input.description, "description")?;
        validation::coordinates(input.latitude, input.longitude)?;

        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pet not found"))?;
        if !pet.status.is_open() {
            return Err(AppError::conflict(
                "This listing is resolved and no longer takes sightings",
            ));
        }

        let sighting = self
            .sightings
            .create(CreateSighting {
                pet_id,
                user_id: ctx.user_id,
                latitude: input.latitude,
                longitude: input.longitude,
                date_time,
                description,
            })
            .await?;
        info!(sighting_id = %sighting.id, pet_id = %pet_id, reporter = %ctx.user_id, "Sighting recorded");

        if !pet.is_owned_by(ctx.user_id) {
            let note = CreateNotification::sighting(pet.user_id, pet.id, pet.display_name());
            if let Err(e) = self.notifications.create(note).await {
                warn!(pet_id = %pet_id, error = %e, "Failed to notify owner of sighting");
            }
        }

        Ok(sighting)
    }
}

/// Parse RFC 3339, or a naive timestamp taken as UTC.
fn parse_date_time(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::validation(format!("Invalid sighting date: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use petfinder_core::error::ErrorKind;
    use petfinder_database::Repositories;
    use petfinder_entity::notification::NotificationKind;
    use petfinder_entity::pet::{CreatePet, NewPetImage, Pet, PetStatus, ResolvePet};

    use super::*;

    async fn listing(repos: &Repositories, owner: Uuid) -> Pet {
        let (pet, _) = repos
            .pets
            .create(
                CreatePet {
                    user_id: owner,
                    name: None,
                    species: "cat".into(),
                    breed: None,
                    color: None,
                    size: None,
                    location: "Park".into(),
                    status: PetStatus::Lost,
                    contact: None,
                    reward: None,
                    latitude: None,
                    longitude: None,
                },
                vec![NewPetImage {
                    url: "http://x/1.png".into(),
                    storage_key: "pets/1.png".into(),
                }],
            )
            .await
            .unwrap();
        pet
    }

    fn service(repos: &Repositories) -> SightingService {
        SightingService::new(
            repos.pets.clone(),
            repos.sightings.clone(),
            repos.notifications.clone(),
        )
    }

    fn report(date_time: String) -> CreateSightingInput {
        CreateSightingInput {
            latitude: -8.0,
            longitude: -34.9,
            date_time,
            description: "Seen near the market".into(),
        }
    }

    #[test]
    fn test_parse_date_time() {
        assert!(parse_date_time("2024-05-01T10:30:00Z").is_ok());
        assert!(parse_date_time("2024-05-01T10:30:00-03:00").is_ok());
        assert_eq!(
            parse_date_time("2024-05-01T10:30").unwrap(),
            parse_date_time("2024-05-01T10:30:00Z").unwrap()
        );
        assert!(parse_date_time("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_sighting_notifies_owner() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let pet = listing(&repos, owner).await;
        let ctx = RequestContext::new(Uuid::new_v4(), "Bia", "bia@example.com");

        let when = (Utc::now() - Duration::hours(1)).to_rfc3339();
        let sighting = service(&repos).create(&ctx, pet.id, report(when)).await.unwrap();
        assert_eq!(sighting.user_id, ctx.user_id);

        let inbox = repos.notifications.find_by_user(owner).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Sighting);
        assert_eq!(inbox[0].title, "New lead on your pet!");
        assert_eq!(inbox[0].link.as_deref(), Some(format!("/pet/{}", pet.id).as_str()));
    }

    #[tokio::test]
    async fn test_owner_sighting_is_silent() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let pet = listing(&repos, owner).await;
        let ctx = RequestContext::new(owner, "Ana", "ana@example.com");

        let when = (Utc::now() - Duration::minutes(5)).to_rfc3339();
        service(&repos).create(&ctx, pet.id, report(when)).await.unwrap();
        assert!(repos.notifications.find_by_user(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_future_and_missing_pet() {
        let repos = Repositories::in_memory();
        let pet = listing(&repos, Uuid::new_v4()).await;
        let ctx = RequestContext::new(Uuid::new_v4(), "Bia", "bia@example.com");

        let future = (Utc::now() + Duration::days(1)).to_rfc3339();
        let err = service(&repos).create(&ctx, pet.id, report(future)).await.unwrap_err();
        assert_eq!(err.message, "Sighting date cannot be in the future");

        let past = (Utc::now() - Duration::days(1)).to_rfc3339();
        let err = service(&repos)
            .create(&ctx, Uuid::new_v4(), report(past))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Pet not found");
    }

    #[tokio::test]
    async fn test_finalized_listing_rejects_sightings() {
        let repos = Repositories::in_memory();
        let owner = Uuid::new_v4();
        let pet = listing(&repos, owner).await;
        repos
            .pets
            .resolve(
                pet.id,
                owner,
                ResolvePet {
                    final_latitude: 0.0,
                    final_longitude: 0.0,
                    found_by_user_id: None,
                    found_by_external: None,
                },
            )
            .await
            .unwrap();

        let ctx = RequestContext::new(Uuid::new_v4(), "Bia", "bia@example.com");
        let past = (Utc::now() - Duration::days(1)).to_rfc3339();
        let err = service(&repos).create(&ctx, pet.id, report(past)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
