//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use petfinder_auth::jwt::{JwtDecoder, JwtEncoder};
use petfinder_auth::password::{PasswordHasher, PasswordValidator};
use petfinder_cache::CacheManager;
use petfinder_core::config::AppConfig;
use petfinder_database::Repositories;
use petfinder_service::{
    AccountService, NotificationService, PetService, ProfileService, ResolutionService,
    SightingService, UploadService,
};
use petfinder_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// Every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Repository bundle (PostgreSQL or in-memory)
    pub repos: Repositories,
    /// Cache manager (Redis or in-memory)
    pub cache: CacheManager,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Registration and login
    pub account_service: Arc<AccountService>,
    /// Own profile
    pub profile_service: Arc<ProfileService>,
    /// Listings
    pub pet_service: Arc<PetService>,
    /// Photo storage
    pub upload_service: Arc<UploadService>,
    /// Sightings
    pub sighting_service: Arc<SightingService>,
    /// Listing resolution
    pub resolution_service: Arc<ResolutionService>,
    /// Notification inbox
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire services over already-initialized infrastructure.
    pub fn new(
        config: AppConfig,
        repos: Repositories,
        cache: CacheManager,
        storage: StorageManager,
    ) -> Self {
        let upload_service = UploadService::new(storage, &config.storage);

        let account_service = AccountService::new(
            repos.users.clone(),
            PasswordHasher::new(),
            PasswordValidator::new(&config.auth),
            JwtEncoder::new(&config.auth),
        );
        let profile_service = ProfileService::new(repos.users.clone());
        let pet_service = PetService::new(
            repos.pets.clone(),
            repos.users.clone(),
            repos.sightings.clone(),
            upload_service.clone(),
            cache.clone(),
            Duration::from_secs(config.cache.listing_ttl_seconds),
        );
        let sighting_service = SightingService::new(
            repos.pets.clone(),
            repos.sightings.clone(),
            repos.notifications.clone(),
        );
        let resolution_service = ResolutionService::new(
            repos.pets.clone(),
            repos.users.clone(),
            repos.notifications.clone(),
            cache.clone(),
        );
        let notification_service = NotificationService::new(repos.notifications.clone());

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            config: Arc::new(config),
            repos,
            cache,
            account_service: Arc::new(account_service),
            profile_service: Arc::new(profile_service),
            pet_service: Arc::new(pet_service),
            upload_service: Arc::new(upload_service),
            sighting_service: Arc::new(sighting_service),
            resolution_service: Arc::new(resolution_service),
            notification_service: Arc::new(notification_service),
        }
    }
}
