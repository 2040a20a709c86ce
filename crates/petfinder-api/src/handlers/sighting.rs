//! Sighting handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use petfinder_entity::sighting::Sighting;

use crate::dto::request::CreateSightingRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson, parse_uuid};
use crate::state::AppState;

/// POST /pets/{id}/sightings
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateSightingRequest>,
) -> ApiResult<(StatusCode, Json<Sighting>)> {
    let pet_id = parse_uuid(&id)?;
    let sighting = state
        .sighting_service
        .create(&auth, pet_id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(sighting)))
}
