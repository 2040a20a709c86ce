//! Profile viewing and editing.

use std::sync::Arc;

use tracing::info;

use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_database::repositories::UserRepository;
use petfinder_entity::user::{UpdateProfile, User};

use crate::context::RequestContext;

/// Handles the signed-in user's own profile.
#[derive(Debug, Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Returns the current user's profile.
    pub async fn show(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the given fields of the current user's profile.
    ///
    /// Absent fields are left unchanged; a present name must not be blank.
    pub async fn update(&self, ctx: &RequestContext, changes: UpdateProfile) -> AppResult<User> {
        let name = match changes.name {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::validation("Name cannot be empty"));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let changes = UpdateProfile {
            name,
            phone: changes.phone.map(|v| v.trim().to_string()),
            city: changes.city.map(|v| v.trim().to_string()),
            state: changes.state.map(|v| v.trim().to_string()),
        };

        let user = self
            .users
            .update_profile(ctx.user_id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user)
    }
}
