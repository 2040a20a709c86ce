//! In-memory repository backend.
//!
//! Selected with `database.provider = "memory"`. All four repositories
//! share one lock so multi-row writes (a pet with its images, a conditional
//! resolve) are atomic, matching the PostgreSQL behaviour.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::types::pagination::{PageRequest, PageResponse};
use petfinder_entity::notification::{CreateNotification, Notification};
use petfinder_entity::pet::{
    CreatePet, NewPetImage, Pet, PetFilter, PetImage, PetStatus, ResolvePet,
};
use petfinder_entity::sighting::{CreateSighting, Sighting};
use petfinder_entity::user::{CreateUser, UpdateProfile, User};

use crate::repositories::{
    NotificationRepository, PetRepository, SightingRepository, UserRepository,
};

/// Rows kept in insertion order; queries sort copies.
#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<User>,
    pets: Vec<Pet>,
    images: Vec<PetImage>,
    sightings: Vec<Sighting>,
    notifications: Vec<Notification>,
}

/// Volatile database implementing every repository trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; later insertions win ties.
fn newest_first<T: Clone, K: Ord>(rows: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by_key(|row| Reverse(key(row)));
    out
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("User already exists"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            phone: None,
            city: None,
            state: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> AppResult<Option<User>> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        data.apply(user);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let state = self.state.read().await;
        let all = newest_first(&state.users, |u| u.created_at);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();
        Ok(PageResponse::new(items, page, total))
    }
}

#[async_trait]
impl PetRepository for MemoryDatabase {
    async fn create(
        &self,
        data: CreatePet,
        images: Vec<NewPetImage>,
    ) -> AppResult<(Pet, Vec<PetImage>)> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let pet = Pet {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name,
            species: data.species,
            breed: data.breed,
            color: data.color,
            size: data.size,
            location: data.location,
            status: data.status,
            contact: data.contact,
            reward: data.reward,
            latitude: data.latitude,
            longitude: data.longitude,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            final_latitude: None,
            final_longitude: None,
            found_by_user_id: None,
            found_by_external: None,
        };
        let stored: Vec<PetImage> = images
            .into_iter()
            .map(|image| PetImage {
                id: Uuid::new_v4(),
                pet_id: pet.id,
                url: image.url,
                storage_key: image.storage_key,
                created_at: now,
            })
            .collect();
        state.pets.push(pet.clone());
        state.images.extend(stored.iter().cloned());
        Ok((pet, stored))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>> {
        let state = self.state.read().await;
        Ok(state.pets.iter().find(|p| p.id == id).cloned())
    }

    async fn list_feed(
        &self,
        filter: &PetFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Pet>> {
        let state = self.state.read().await;
        let matching: Vec<Pet> = newest_first(&state.pets, |p| p.created_at)
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn find_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Pet>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.pets, |p| p.created_at)
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect())
    }

    async fn find_by_finder(&self, user_id: Uuid) -> AppResult<Vec<Pet>> {
        let state = self.state.read().await;
        // `Option` orders `None` first, so unresolved rows sink to the end.
        Ok(newest_first(&state.pets, |p| p.resolved_at)
            .into_iter()
            .filter(|p| p.found_by_user_id == Some(user_id))
            .collect())
    }

    async fn images_for(&self, pet_ids: &[Uuid]) -> AppResult<Vec<PetImage>> {
        let state = self.state.read().await;
        Ok(state
            .images
            .iter()
            .filter(|i| pet_ids.contains(&i.pet_id))
            .cloned()
            .collect())
    }

    async fn resolve(&self, id: Uuid, owner_id: Uuid, data: ResolvePet) -> AppResult<Option<Pet>> {
        let mut state = self.state.write().await;
        let Some(pet) = state
            .pets
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner_id && p.status.is_open())
        else {
            return Ok(None);
        };
        let now = Utc::now();
        pet.status = PetStatus::Finalized;
        pet.resolved_at = Some(now);
        pet.updated_at = now;
        pet.final_latitude = Some(data.final_latitude);
        pet.final_longitude = Some(data.final_longitude);
        pet.found_by_user_id = data.found_by_user_id;
        pet.found_by_external = data.found_by_external;
        Ok(Some(pet.clone()))
    }
}

#[async_trait]
impl SightingRepository for MemoryDatabase {
    async fn create(&self, data: CreateSighting) -> AppResult<Sighting> {
        let mut state = self.state.write().await;
        let sighting = Sighting {
            id: Uuid::new_v4(),
            pet_id: data.pet_id,
            user_id: data.user_id,
            latitude: data.latitude,
            longitude: data.longitude,
            date_time: data.date_time,
            description: data.description,
            created_at: Utc::now(),
        };
        state.sightings.push(sighting.clone());
        Ok(sighting)
    }

    async fn find_by_pet(&self, pet_id: Uuid) -> AppResult<Vec<Sighting>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.sightings, |s| (s.date_time, s.created_at))
            .into_iter()
            .filter(|s| s.pet_id == pet_id)
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for MemoryDatabase {
    async fn create(&self, data: CreateNotification) -> AppResult<Notification> {
        let mut state = self.state.write().await;
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            kind: data.kind,
            title: data.title,
            message: data.message,
            link: data.link,
            read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.notifications, |n| n.created_at)
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect())
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut marked = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            n.read = true;
            marked += 1;
        }
        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use petfinder_core::error::ErrorKind;
    use petfinder_entity::notification::NotificationKind;

    use super::*;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Tester".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_pet(owner: Uuid, name: &str) -> CreatePet {
        CreatePet {
            user_id: owner,
            name: Some(name.to_string()),
            species: "dog".to_string(),
            breed: None,
            color: None,
            size: None,
            location: "Praça".to_string(),
            status: PetStatus::Lost,
            contact: None,
            reward: None,
            latitude: None,
            longitude: None,
        }
    }

    fn resolution() -> ResolvePet {
        ResolvePet {
            final_latitude: -8.05,
            final_longitude: -34.9,
            found_by_user_id: None,
            found_by_external: Some("Neighbour".to_string()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_ignoring_case() {
        let db = MemoryDatabase::new();
        UserRepository::create(&db, new_user("ana@example.com"))
            .await
            .unwrap();
        let err = UserRepository::create(&db, new_user("ANA@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(db.find_by_email("Ana@Example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_and_hides_finalized() {
        let db = MemoryDatabase::new();
        let owner = Uuid::new_v4();
        let (first, _) = PetRepository::create(&db, new_pet(owner, "First"), vec![])
            .await
            .unwrap();
        let (second, _) = PetRepository::create(&db, new_pet(owner, "Second"), vec![])
            .await
            .unwrap();

        let feed = db
            .list_feed(&PetFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        let ids: Vec<Uuid> = feed.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        db.resolve(first.id, owner, resolution()).await.unwrap();
        let feed = db
            .list_feed(&PetFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(feed.total_items, 1);
        assert_eq!(feed.items[0].id, second.id);
    }

    #[tokio::test]
    async fn test_resolve_is_conditional() {
        let db = MemoryDatabase::new();
        let owner = Uuid::new_v4();
        let (pet, _) = PetRepository::create(&db, new_pet(owner, "Mel"), vec![])
            .await
            .unwrap();

        assert!(db.resolve(pet.id, Uuid::new_v4(), resolution()).await.unwrap().is_none());
        let resolved = db.resolve(pet.id, owner, resolution()).await.unwrap().unwrap();
        assert_eq!(resolved.status, PetStatus::Finalized);
        assert!(resolved.resolved_at.is_some());
        assert!(db.resolve(pet.id, owner, resolution()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_images_are_stored_with_pet() {
        let db = MemoryDatabase::new();
        let images = vec![
            NewPetImage {
                url: "http://x/uploads/a.jpg".to_string(),
                storage_key: "pets/a.jpg".to_string(),
            },
            NewPetImage {
                url: "http://x/uploads/b.jpg".to_string(),
                storage_key: "pets/b.jpg".to_string(),
            },
        ];
        let (pet, stored) = PetRepository::create(&db, new_pet(Uuid::new_v4(), "Bob"), images)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        let loaded = db.images_for(&[pet.id]).await.unwrap();
        assert_eq!(loaded[0].storage_key, "pets/a.jpg");
        assert_eq!(loaded[1].storage_key, "pets/b.jpg");
    }

    #[tokio::test]
    async fn test_mark_read_is_scoped_to_owner() {
        let db = MemoryDatabase::new();
        let owner = Uuid::new_v4();
        let n = NotificationRepository::create(
            &db,
            CreateNotification::sighting(owner, Uuid::new_v4(), "Rex"),
        )
        .await
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Sighting);
        assert_eq!(db.count_unread(owner).await.unwrap(), 1);

        assert!(!db.mark_read(n.id, Uuid::new_v4()).await.unwrap());
        assert_eq!(db.count_unread(owner).await.unwrap(), 1);

        assert!(db.mark_read(n.id, owner).await.unwrap());
        assert_eq!(db.count_unread(owner).await.unwrap(), 0);
        assert_eq!(db.mark_all_read(owner).await.unwrap(), 0);
    }
}
