//! Listing resolution handler.

use axum::Json;
use axum::extract::{Path, State};

use petfinder_entity::pet::Pet;

use crate::dto::request::ResolvePetRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// PATCH /pets/{id}/resolve
pub async fn resolve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ResolvePetRequest>,
) -> ApiResult<Json<Pet>> {
    let pet_id = parse_uuid(&id)?;
    let pet = state
        .resolution_service
        .resolve(&auth, pet_id, req.into())
        .await?;
    Ok(Json(pet))
}
