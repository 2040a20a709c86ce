//! Pet listing repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use petfinder_core::result::AppResult;
use petfinder_core::types::pagination::{PageRequest, PageResponse};
use petfinder_entity::pet::{CreatePet, NewPetImage, Pet, PetFilter, PetImage, ResolvePet};

use super::db_err;

/// Storage operations on listings and their images.
#[async_trait]
pub trait PetRepository: Send + Sync + std::fmt::Debug {
    /// Insert a listing together with its images, atomically.
    async fn create(&self, data: CreatePet, images: Vec<NewPetImage>)
    -> AppResult<(Pet, Vec<PetImage>)>;

    /// Find a listing by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>>;

    /// The public feed: open listings matching `filter`, newest first.
    async fn list_feed(&self, filter: &PetFilter, page: &PageRequest)
    -> AppResult<PageResponse<Pet>>;

    /// Listings created by `user_id`, newest first.
    async fn find_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Pet>>;

    /// Listings where `user_id` was credited as finder, most recently resolved first.
    async fn find_by_finder(&self, user_id: Uuid) -> AppResult<Vec<Pet>>;

    /// Images of the given listings, oldest first.
    async fn images_for(&self, pet_ids: &[Uuid]) -> AppResult<Vec<PetImage>>;

    /// Finalize a listing owned by `owner_id`.
    ///
    /// The update only applies while the listing is still open; `None` means
    /// no row matched (missing, foreign, or already finalized).
    async fn resolve(&self, id: Uuid, owner_id: Uuid, data: ResolvePet) -> AppResult<Option<Pet>>;
}

/// PostgreSQL-backed [`PetRepository`].
#[derive(Debug, Clone)]
pub struct PgPetRepository {
    pool: PgPool,
}

impl PgPetRepository {
    /// Create a new pet repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the feed predicates to a query that already has a `WHERE` clause.
fn push_feed_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a PetFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(species) = &filter.species {
        qb.push(" AND LOWER(species) = LOWER(")
            .push_bind(species.as_str())
            .push(")");
    }
    if let Some(pattern) = filter.search_pattern() {
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR breed ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    async fn create(
        &self,
        data: CreatePet,
        images: Vec<NewPetImage>,
    ) -> AppResult<(Pet, Vec<PetImage>)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let pet = sqlx::query_as::<_, Pet>(
            "INSERT INTO pets (id, user_id, name, species, breed, color, size, location, \
                               status, contact, reward, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.species)
        .bind(&data.breed)
        .bind(&data.color)
        .bind(data.size)
        .bind(&data.location)
        .bind(data.status)
        .bind(&data.contact)
        .bind(&data.reward)
        .bind(data.latitude)
        .bind(data.longitude)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to create pet"))?;

        let mut stored = Vec::with_capacity(images.len());
        for image in images {
            let row = sqlx::query_as::<_, PetImage>(
                "INSERT INTO pet_images (id, pet_id, url, storage_key) \
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(Uuid::new_v4())
            .bind(pet.id)
            .bind(&image.url)
            .bind(&image.storage_key)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err("Failed to attach pet image"))?;
            stored.push(row);
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit pet creation"))?;

        Ok((pet, stored))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Pet>> {
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find pet by id"))
    }

    async fn list_feed(
        &self,
        filter: &PetFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Pet>> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM pets WHERE status <> 'finalized'");
        push_feed_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count pets"))?;

        let mut query =
            QueryBuilder::<Postgres>::new("SELECT * FROM pets WHERE status <> 'finalized'");
        push_feed_filter(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.sql_limit())
            .push(" OFFSET ")
            .push_bind(page.sql_offset());

        let pets = query
            .build_query_as::<Pet>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list pets"))?;

        Ok(PageResponse::new(pets, page, total as u64))
    }

    async fn find_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Pet>> {
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list pets by owner"))
    }

    async fn find_by_finder(&self, user_id: Uuid) -> AppResult<Vec<Pet>> {
        sqlx::query_as::<_, Pet>(
            "SELECT * FROM pets WHERE found_by_user_id = $1 ORDER BY resolved_at DESC NULLS LAST",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list pets by finder"))
    }

    async fn images_for(&self, pet_ids: &[Uuid]) -> AppResult<Vec<PetImage>> {
        if pet_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, PetImage>(
            "SELECT * FROM pet_images WHERE pet_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(pet_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load pet images"))
    }

    async fn resolve(&self, id: Uuid, owner_id: Uuid, data: ResolvePet) -> AppResult<Option<Pet>> {
        let now = Utc::now();
        sqlx::query_as::<_, Pet>(
            "UPDATE pets SET \
                status = 'finalized', \
                resolved_at = $3, \
                updated_at = $3, \
                final_latitude = $4, \
                final_longitude = $5, \
                found_by_user_id = $6, \
                found_by_external = $7 \
             WHERE id = $1 AND user_id = $2 AND status <> 'finalized' \
             RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .bind(now)
        .bind(data.final_latitude)
        .bind(data.final_longitude)
        .bind(data.found_by_user_id)
        .bind(&data.found_by_external)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to resolve pet"))
    }
}
