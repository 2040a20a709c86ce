//! Listing creation and the read paths over listings.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use petfinder_cache::CacheManager;
use petfinder_cache::keys;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::traits::cache::CacheProvider;
use petfinder_core::types::pagination::{PageRequest, PageResponse};
use petfinder_database::repositories::{PetRepository, SightingRepository, UserRepository};
use petfinder_entity::pet::{CreatePet, Pet, PetFilter, PetSize, PetStatus};
use petfinder_storage::ImageUpload;

use super::views::{
    ContactCard, MyPetItem, PetDetails, PetListItem, PetRelation, SightingView, UserContact,
    images_by_pet, users_by_id,
};
use crate::context::RequestContext;
use crate::upload::UploadService;
use crate::validation;

/// Generation assumed before any listing change has been recorded.
const INITIAL_GENERATION: &str = "0";

/// How long a feed generation marker lives; far longer than any feed entry.
const GENERATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Cached feed page, stamped with the generation it was read under.
#[derive(Debug, Serialize, Deserialize)]
struct CachedFeed {
    generation: String,
    feed: PageResponse<PetListItem>,
}

/// Text fields of the listing form, as submitted.
#[derive(Debug, Clone, Default)]
pub struct CreatePetInput {
    /// Pet name.
    pub name: Option<String>,
    /// Species (required).
    pub species: String,
    /// Breed.
    pub breed: Option<String>,
    /// Coat color.
    pub color: Option<String>,
    /// Size label.
    pub size: Option<String>,
    /// Free-text location (required).
    pub location: String,
    /// Status label (required).
    pub status: String,
    /// Contact shown on the listing.
    pub contact: Option<String>,
    /// Reward offered.
    pub reward: Option<String>,
    /// Latitude as text.
    pub latitude: Option<String>,
    /// Longitude as text.
    pub longitude: Option<String>,
}

/// Handles listings.
#[derive(Debug, Clone)]
pub struct PetService {
    pets: Arc<dyn PetRepository>,
    users: Arc<dyn UserRepository>,
    sightings: Arc<dyn SightingRepository>,
    uploads: UploadService,
    cache: CacheManager,
    feed_ttl: Duration,
}

impl PetService {
    /// Creates a new pet service.
    pub fn new(
        pets: Arc<dyn PetRepository>,
        users: Arc<dyn UserRepository>,
        sightings: Arc<dyn SightingRepository>,
        uploads: UploadService,
        cache: CacheManager,
        feed_ttl: Duration,
    ) -> Self {
        Self {
            pets,
            users,
            sightings,
            uploads,
            cache,
            feed_ttl,
        }
    }

    /// Creates a listing with its photos.
    ///
    /// Photos are stored before the row is written and removed again if the
    /// write fails.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreatePetInput,
        uploads: Vec<ImageUpload>,
    ) -> AppResult<PetListItem> {
        let data = Self::build_listing(ctx.user_id, input)?;
        let images = self.uploads.validate_all(uploads)?;
        let stored = self.uploads.store_all(&images).await?;

        let (pet, images) = match self.pets.create(data, stored.clone()).await {
            Ok(created) => created,
            Err(e) => {
                self.uploads.discard(&stored).await;
                return Err(e);
            }
        };

        info!(
            pet_id = %pet.id,
            user_id = %ctx.user_id,
            status = %pet.status,
            images = images.len(),
            "Listing created"
        );
        invalidate_feed(&self.cache).await;

        let owner = self.users.find_by_id(ctx.user_id).await?;
        Ok(PetListItem {
            pet,
            images,
            owner: owner.as_ref().map(ContactCard::from),
        })
    }

    /// Validate the form fields and turn them into a row.
    fn build_listing(owner: Uuid, input: CreatePetInput) -> AppResult<CreatePet> {
        let species = validation::required(&input.species, "species")?;
        let location = validation::required(&input.location, "location")?;

        let status = PetStatus::from_str(&input.status)?;
        if !status.is_open() {
            return Err(AppError::validation(
                "A new listing must be lost, found or adoption",
            ));
        }

        let size = validation::optional(input.size)
            .map(|s| PetSize::from_str(&s))
            .transpose()?;

        let latitude = validation::parse_coordinate(input.latitude.as_deref(), "latitude")?;
        let longitude = validation::parse_coordinate(input.longitude.as_deref(), "longitude")?;
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => validation::coordinates(lat, lon)?,
            (None, None) => {}
            _ => {
                return Err(AppError::validation(
                    "Latitude and longitude must be provided together",
                ));
            }
        }

        Ok(CreatePet {
            user_id: owner,
            name: validation::optional(input.name),
            species,
            breed: validation::optional(input.breed),
            color: validation::optional(input.color),
            size,
            location,
            status,
            contact: validation::optional(input.contact),
            reward: validation::optional(input.reward),
            latitude,
            longitude,
        })
    }

    /// The public feed.
    ///
    /// The unfiltered first page is served from cache when possible. A cached
    /// page only counts if it was read under the current feed generation, so
    /// a write racing with a listing change is never served.
    pub async fn list(
        &self,
        filter: &PetFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PetListItem>> {
        let key = keys::pet_feed();
        let generation = if filter.is_empty() && page.is_default() {
            feed_generation(&self.cache).await
        } else {
            None
        };

        if let Some(generation) = &generation {
            match self.cache.get_json::<CachedFeed>(&key).await {
                Ok(Some(cached)) if cached.generation == *generation => {
                    debug!("Serving listing feed from cache");
                    return Ok(cached.feed);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Feed cache read failed"),
            }
        }

        let pets = self.pets.list_feed(filter, page).await?;
        let ids: Vec<Uuid> = pets.items.iter().map(|p| p.id).collect();
        let mut images = images_by_pet(self.pets.images_for(&ids).await?);
        let owners = users_by_id(self.users.find_by_ids(&owner_ids(&pets.items)).await?);

        let feed = pets.map(|pet| PetListItem {
            images: images.remove(&pet.id).unwrap_or_default(),
            owner: owners.get(&pet.user_id).map(ContactCard::from),
            pet,
        });

        match generation {
            Some(generation) => {
                let entry = CachedFeed { generation, feed };
                if let Err(e) = self.cache.set_json(&key, &entry, self.feed_ttl).await {
                    warn!(error = %e, "Feed cache write failed");
                }
                Ok(entry.feed)
            }
            None => Ok(feed),
        }
    }

    /// A listing with photos, owner contact and sightings.
    pub async fn details(&self, pet_id: Uuid) -> AppResult<PetDetails> {
        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pet not found"))?;

        let images = self.pets.images_for(&[pet.id]).await?;
        let sightings = self.sightings.find_by_pet(pet.id).await?;

        let mut people: HashSet<Uuid> = sightings.iter().map(|s| s.user_id).collect();
        people.insert(pet.user_id);
        let people: Vec<Uuid> = people.into_iter().collect();
        let users = users_by_id(self.users.find_by_ids(&people).await?);

        let sightings = sightings
            .into_iter()
            .map(|sighting| SightingView {
                reporter: users.get(&sighting.user_id).map(UserContact::from),
                sighting,
            })
            .collect();

        Ok(PetDetails {
            owner: users.get(&pet.user_id).map(UserContact::from),
            images,
            sightings,
            pet,
        })
    }

    /// The user's own listings followed by listings they were credited with finding.
    pub async fn my_pets(&self, ctx: &RequestContext) -> AppResult<Vec<MyPetItem>> {
        let owned = self.pets.find_by_owner(ctx.user_id).await?;
        let found: Vec<Pet> = self
            .pets
            .find_by_finder(ctx.user_id)
            .await?
            .into_iter()
            .filter(|p| !p.is_owned_by(ctx.user_id))
            .collect();

        let ids: Vec<Uuid> = owned.iter().chain(found.iter()).map(|p| p.id).collect();
        let mut images = images_by_pet(self.pets.images_for(&ids).await?);

        let mut people: HashSet<Uuid> = owned.iter().filter_map(|p| p.found_by_user_id).collect();
        people.extend(found.iter().map(|p| p.user_id));
        let people: Vec<Uuid> = people.into_iter().collect();
        let users = users_by_id(self.users.find_by_ids(&people).await?);

        let mut items = Vec::with_capacity(owned.len() + found.len());
        for pet in owned {
            items.push(MyPetItem {
                images: images.remove(&pet.id).unwrap_or_default(),
                relation: PetRelation::Owner,
                finder: pet
                    .found_by_user_id
                    .and_then(|id| users.get(&id))
                    .map(ContactCard::from),
                owner: None,
                pet,
            });
        }
        for pet in found {
            items.push(MyPetItem {
                images: images.remove(&pet.id).unwrap_or_default(),
                relation: PetRelation::Finder,
                finder: None,
                owner: users.get(&pet.user_id).map(ContactCard::from),
                pet,
            });
        }
        Ok(items)
    }
}

fn owner_ids(pets: &[Pet]) -> Vec<Uuid> {
    let unique: HashSet<Uuid> = pets.iter().map(|p| p.user_id).collect();
    unique.into_iter().collect()
}

/// The current feed generation, or `None` when the cache cannot be read.
async fn feed_generation(cache: &CacheManager) -> Option<String> {
    match cache.get(&keys::pet_feed_generation()).await {
        Ok(generation) => Some(generation.unwrap_or_else(|| INITIAL_GENERATION.to_string())),
        Err(e) => {
            warn!(error = %e, "Feed generation read failed");
            None
        }
    }
}

/// Start a new feed generation and drop the cached feed after a listing changes.
pub(crate) async fn invalidate_feed(cache: &CacheManager) {
    let generation = Uuid::new_v4().simple().to_string();
    if let Err(e) = cache
        .set(&keys::pet_feed_generation(), &generation, GENERATION_TTL)
        .await
    {
        warn!(error = %e, "Failed to advance listing feed generation");
    }
    if let Err(e) = cache.delete(&keys::pet_feed()).await {
        warn!(error = %e, "Failed to invalidate listing feed cache");
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use petfinder_core::config::{CacheConfig, StorageConfig};
    use petfinder_core::error::ErrorKind;
    use petfinder_database::Repositories;
    use petfinder_entity::pet::ResolvePet;
    use petfinder_entity::sighting::CreateSighting;
    use petfinder_entity::user::{CreateUser, User};
    use petfinder_storage::StorageManager;
    use petfinder_storage::providers::LocalStorageProvider;

    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    struct Fixture {
        service: PetService,
        repos: Repositories,
        cache: CacheManager,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let repos = Repositories::in_memory();
        let cache = CacheManager::new(&CacheConfig::default()).await.unwrap();
        let provider = LocalStorageProvider::new(dir.path()).await.unwrap();
        let storage = StorageManager::from_provider(Arc::new(provider), "http://localhost/uploads");
        let uploads = UploadService::new(storage, &StorageConfig::default());
        let service = PetService::new(
            repos.pets.clone(),
            repos.users.clone(),
            repos.sightings.clone(),
            uploads,
            cache.clone(),
            Duration::from_secs(30),
        );
        Fixture {
            service,
            repos,
            cache,
            _dir: dir,
        }
    }

    async fn user(repos: &Repositories, email: &str) -> (User, RequestContext) {
        let user = repos
            .users
            .create(CreateUser {
                name: email.split('@').next().unwrap_or("x").to_string(),
                email: email.to_string(),
                password_hash: "x".into(),
            })
            .await
            .unwrap();
        let ctx = RequestContext::new(user.id, &user.name, &user.email);
        (user, ctx)
    }

    fn input(status: &str) -> CreatePetInput {
        CreatePetInput {
            name: Some("Rex".into()),
            species: "dog".into(),
            location: "Downtown".into(),
            status: status.into(),
            latitude: Some("-8.05".into()),
            longitude: Some("-34.9".into()),
            ..CreatePetInput::default()
        }
    }

    fn photo() -> Vec<ImageUpload> {
        vec![ImageUpload {
            file_name: Some("rex.png".into()),
            content_type: "image/png".into(),
            data: Bytes::from_static(PNG),
        }]
    }

    #[tokio::test]
    async fn test_create_returns_images() {
        let fx = fixture().await;
        let (_, ctx) = user(&fx.repos, "ana@example.com").await;
        let item = fx.service.create(&ctx, input("lost"), photo()).await.unwrap();
        assert_eq!(item.pet.status, PetStatus::Lost);
        assert_eq!(item.pet.latitude, Some(-8.05));
        assert_eq!(item.images.len(), 1);
        assert_eq!(item.owner.unwrap().name, "ana");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let fx = fixture().await;
        let (_, ctx) = user(&fx.repos, "ana@example.com").await;

        let err = fx.service.create(&ctx, input("finalized"), photo()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = fx.service.create(&ctx, input("lost"), vec![]).await.unwrap_err();
        assert_eq!(err.message, "At least one photo is required");

        let mut missing_species = input("lost");
        missing_species.species = " ".into();
        assert!(fx.service.create(&ctx, missing_species, photo()).await.is_err());

        let mut bad_lat = input("lost");
        bad_lat.latitude = Some("123".into());
        assert!(fx.service.create(&ctx, bad_lat, photo()).await.is_err());
    }

    #[tokio::test]
    async fn test_feed_is_cached_and_invalidated() {
        let fx = fixture().await;
        let (_, ctx) = user(&fx.repos, "ana@example.com").await;
        fx.service.create(&ctx, input("lost"), photo()).await.unwrap();

        let feed = fx
            .service
            .list(&PetFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.total_items, 1);
        assert!(fx.cache.exists(&keys::pet_feed()).await.unwrap());

        fx.service.create(&ctx, input("found"), photo()).await.unwrap();
        assert!(!fx.cache.exists(&keys::pet_feed()).await.unwrap());

        let feed = fx
            .service
            .list(&PetFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.total_items, 2);
        assert_eq!(feed.items[0].pet.status, PetStatus::Found);
        assert_eq!(feed.items[0].images.len(), 1);
    }

    #[tokio::test]
    async fn test_feed_written_before_a_change_is_not_served() {
        let fx = fixture().await;
        let (_, ctx) = user(&fx.repos, "ana@example.com").await;
        fx.service.create(&ctx, input("lost"), photo()).await.unwrap();

        let default_page = PageRequest::default();
        let earlier_generation = feed_generation(&fx.cache).await.unwrap();
        let stale = fx
            .service
            .list(&PetFilter::default(), &default_page)
            .await
            .unwrap();
        assert_eq!(stale.total_items, 1);

        fx.service.create(&ctx, input("found"), photo()).await.unwrap();

        // A feed read before the new listing lands in the cache afterwards.
        let late_write = CachedFeed {
            generation: earlier_generation,
            feed: stale,
        };
        fx.cache
            .set_json(&keys::pet_feed(), &late_write, Duration::from_secs(30))
            .await
            .unwrap();

        let feed = fx
            .service
            .list(&PetFilter::default(), &default_page)
            .await
            .unwrap();
        assert_eq!(feed.total_items, 2);

        let cached = fx
            .cache
            .get_json::<CachedFeed>(&keys::pet_feed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.feed.total_items, 2);
    }

    #[tokio::test]
    async fn test_filtered_feed_bypasses_cache() {
        let fx = fixture().await;
        let (_, ctx) = user(&fx.repos, "ana@example.com").await;
        fx.service.create(&ctx, input("lost"), photo()).await.unwrap();
        fx.service.create(&ctx, input("adoption"), photo()).await.unwrap();

        let filter = PetFilter::new(Some(PetStatus::Adoption), None, None);
        let feed = fx.service.list(&filter, &PageRequest::default()).await.unwrap();
        assert_eq!(feed.total_items, 1);
        assert!(!fx.cache.exists(&keys::pet_feed()).await.unwrap());
    }

    #[tokio::test]
    async fn test_details_include_sightings_and_owner() {
        let fx = fixture().await;
        let (owner, ctx) = user(&fx.repos, "ana@example.com").await;
        let (reporter, _) = user(&fx.repos, "bia@example.com").await;
        let item = fx.service.create(&ctx, input("lost"), photo()).await.unwrap();

        fx.repos
            .sightings
            .create(CreateSighting {
                pet_id: item.pet.id,
                user_id: reporter.id,
                latitude: 1.0,
                longitude: 2.0,
                date_time: chrono::Utc::now(),
                description: "Near the bakery".into(),
            })
            .await
            .unwrap();

        let details = fx.service.details(item.pet.id).await.unwrap();
        assert_eq!(details.owner.unwrap().email, owner.email);
        assert_eq!(details.sightings.len(), 1);
        assert_eq!(details.sightings[0].reporter.as_ref().unwrap().id, reporter.id);

        let err = fx.service.details(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.message, "Pet not found");
    }

    #[tokio::test]
    async fn test_my_pets_lists_owned_then_found() {
        let fx = fixture().await;
        let (_, owner_ctx) = user(&fx.repos, "ana@example.com").await;
        let (finder, finder_ctx) = user(&fx.repos, "bia@example.com").await;
        let lost = fx.service.create(&owner_ctx, input("lost"), photo()).await.unwrap();
        fx.service.create(&finder_ctx, input("found"), photo()).await.unwrap();

        fx.repos
            .pets
            .resolve(
                lost.pet.id,
                owner_ctx.user_id,
                ResolvePet {
                    final_latitude: 0.0,
                    final_longitude: 0.0,
                    found_by_user_id: Some(finder.id),
                    found_by_external: None,
                },
            )
            .await
            .unwrap();

        let mine = fx.service.my_pets(&finder_ctx).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].relation, PetRelation::Owner);
        assert_eq!(mine[1].relation, PetRelation::Finder);
        assert_eq!(mine[1].owner.as_ref().unwrap().name, "ana");

        let theirs = fx.service.my_pets(&owner_ctx).await.unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].finder.as_ref().unwrap().name, "bia");
    }
}
