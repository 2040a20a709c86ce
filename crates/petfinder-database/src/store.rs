//! Repository bundle selected from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use petfinder_core::config::DatabaseConfig;
use petfinder_core::error::AppError;

use crate::connection::DatabasePool;
use crate::memory::MemoryDatabase;
use crate::migration::run_migrations;
use crate::repositories::{
    NotificationRepository, PetRepository, PgNotificationRepository, PgPetRepository,
    PgSightingRepository, PgUserRepository, SightingRepository, UserRepository,
};

/// Handles to every repository plus the pool backing them, if any.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Accounts.
    pub users: Arc<dyn UserRepository>,
    /// Listings and images.
    pub pets: Arc<dyn PetRepository>,
    /// Sightings.
    pub sightings: Arc<dyn SightingRepository>,
    /// Inbox.
    pub notifications: Arc<dyn NotificationRepository>,
    pool: Option<DatabasePool>,
}

impl Repositories {
    /// Build repositories for the configured provider.
    ///
    /// For PostgreSQL this connects and, when `run_migrations` is set,
    /// applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        if config.is_memory() {
            warn!("Using the in-memory database; data is lost on restart");
            return Ok(Self::in_memory());
        }

        let pool = DatabasePool::connect(config).await?;
        if config.run_migrations {
            run_migrations(pool.pool()).await?;
        }
        Ok(Self::postgres(pool))
    }

    /// Repositories over an existing PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        info!("PostgreSQL repositories initialized");
        Self {
            users: Arc::new(PgUserRepository::new(pg.clone())),
            pets: Arc::new(PgPetRepository::new(pg.clone())),
            sightings: Arc::new(PgSightingRepository::new(pg.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Repositories over a fresh in-memory store.
    pub fn in_memory() -> Self {
        let db = MemoryDatabase::new();
        Self {
            users: Arc::new(db.clone()),
            pets: Arc::new(db.clone()),
            sightings: Arc::new(db.clone()),
            notifications: Arc::new(db),
            pool: None,
        }
    }

    /// The PostgreSQL pool, when that backend is in use.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Short status string for health reporting.
    pub async fn health(&self) -> &'static str {
        match &self.pool {
            None => "memory",
            Some(pool) => match pool.health_check().await {
                Ok(true) => "ok",
                _ => "unavailable",
            },
        }
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
