//! Own-profile handlers.

use axum::Json;
use axum::extract::State;

use petfinder_entity::user::User;

use crate::dto::request::UpdateProfileRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /profile
pub async fn show(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = state.profile_service.show(&auth).await?;
    Ok(Json(user))
}

/// PUT /profile
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = state.profile_service.update(&auth, req.into()).await?;
    Ok(Json(user))
}
