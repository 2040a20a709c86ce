//! Sighting repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use petfinder_core::result::AppResult;
use petfinder_entity::sighting::{CreateSighting, Sighting};

use super::db_err;

/// Storage operations on sightings.
#[async_trait]
pub trait SightingRepository: Send + Sync + std::fmt::Debug {
    /// Record a sighting.
    async fn create(&self, data: CreateSighting) -> AppResult<Sighting>;

    /// Sightings of a listing, most recent `date_time` first.
    async fn find_by_pet(&self, pet_id: Uuid) -> AppResult<Vec<Sighting>>;
}

/// PostgreSQL-backed [`SightingRepository`].
#[derive(Debug, Clone)]
pub struct PgSightingRepository {
    pool: PgPool,
}

impl PgSightingRepository {
    /// Create a new sighting repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SightingRepository for PgSightingRepository {
    async fn create(&self, data: CreateSighting) -> AppResult<Sighting> {
        sqlx::query_as::<_, Sighting>(
            "INSERT INTO sightings (id, pet_id, user_id, latitude, longitude, date_time, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.pet_id)
        .bind(data.user_id)
        .bind(data.latitude)
        .bind(data.longitude)
        .bind(data.date_time)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create sighting"))
    }

    async fn find_by_pet(&self, pet_id: Uuid) -> AppResult<Vec<Sighting>> {
        sqlx::query_as::<_, Sighting>(
            "SELECT * FROM sightings WHERE pet_id = $1 ORDER BY date_time DESC, created_at DESC",
        )
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list sightings"))
    }
}
