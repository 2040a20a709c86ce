//! Resolving a listing: the status flip, finder credit and thank-you note.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use petfinder_cache::CacheManager;
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_database::repositories::{NotificationRepository, PetRepository, UserRepository};
use petfinder_entity::notification::CreateNotification;
use petfinder_entity::pet::{Pet, ResolvePet};

use crate::context::RequestContext;
use crate::pet::service::invalidate_feed;
use crate::validation;

/// Owner-facing message for both "missing" and "not yours".
const NOT_FOUND_OR_FORBIDDEN: &str = "Pet not found or permission denied";
const ALREADY_RESOLVED: &str = "Listing already resolved";

/// Resolution data as submitted by the owner.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// Where the story ended.
    pub final_latitude: f64,
    /// Where the story ended.
    pub final_longitude: f64,
    /// Email of a registered finder to credit.
    pub finder_email: Option<String>,
    /// Name of a finder without an account.
    pub found_by_external: Option<String>,
}

/// Closes listings.
#[derive(Debug, Clone)]
pub struct ResolutionService {
    pets: Arc<dyn PetRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
    cache: CacheManager,
}

impl ResolutionService {
    /// Creates a new resolution service.
    pub fn new(
        pets: Arc<dyn PetRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
        cache: CacheManager,
    ) -> Self {
        Self {
            pets,
            users,
            notifications,
            cache,
        }
    }

    /// Marks the caller's listing as finalized.
    ///
    /// A registered finder (by email) takes precedence over an external
    /// name. The write only succeeds while the listing is still open, so
    /// concurrent resolutions of the same listing yield one winner.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        pet_id: Uuid,
        input: ResolveInput,
    ) -> AppResult<Pet> {
        validation::coordinates(input.final_latitude, input.final_longitude)?;

        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .filter(|p| p.is_owned_by(ctx.user_id))
            .ok_or_else(|| AppError::not_found(NOT_FOUND_OR_FORBIDDEN))?;
        if !pet.status.is_open() {
            return Err(AppError::conflict(ALREADY_RESOLVED));
        }

        let (found_by_user_id, found_by_external) =
            match validation::optional(input.finder_email) {
                Some(email) => {
                    let finder = self
                        .users
                        .find_by_email(&email.to_lowercase())
                        .await?
                        .ok_or_else(|| {
                            AppError::not_found(format!("User with email '{email}' not found"))
                        })?;
                    (Some(finder.id), None)
                }
                None => (None, validation::optional(input.found_by_external)),
            };

        let resolved = self
            .pets
            .resolve(
                pet_id,
                ctx.user_id,
                ResolvePet {
                    final_latitude: input.final_latitude,
                    final_longitude: input.final_longitude,
                    found_by_user_id,
                    found_by_external,
                },
            )
            .await?
            .ok_or_else(|| AppError::conflict(ALREADY_RESOLVED))?;

        info!(
            pet_id = %pet_id,
            owner = %ctx.user_id,
            finder = ?resolved.found_by_user_id,
            "Listing resolved"
        );
        invalidate_feed(&self.cache).await;

        if let Some(finder_id) = resolved.found_by_user_id.filter(|id| *id != ctx.user_id) {
            let note = CreateNotification::resolution(finder_id, resolved.id, resolved.display_name());
            if let Err(e) = self.notifications.create(note).await {
                warn!(pet_id = %pet_id, error = %e, "Failed to notify finder of resolution");
            }
        }

        Ok(resolved)
    }
}
