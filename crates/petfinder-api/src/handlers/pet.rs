//! Listing handlers.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use petfinder_core::error::AppError;
use petfinder_core::types::pagination::PageResponse;
use petfinder_service::CreatePetInput;
use petfinder_service::pet::{MyPetItem, PetDetails, PetListItem};
use petfinder_storage::ImageUpload;

use crate::dto::request::FeedQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// Multipart field carrying photos.
const IMAGES_FIELD: &str = "images";

/// GET /pets
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<PageResponse<PetListItem>>> {
    let (filter, page) = query.into_parts()?;
    let feed = state.pet_service.list(&filter, &page).await?;
    Ok(Json(feed))
}

/// POST /pets (multipart)
///
/// Text fields carry the listing; every `images` part is a photo.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<PetListItem>)> {
    let mut input = CreatePetInput::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGES_FIELD {
            uploads.push(read_image(field).await?);
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => input.name = Some(value),
            "species" => input.species = value,
            "breed" => input.breed = Some(value),
            "color" => input.color = Some(value),
            "size" => input.size = Some(value),
            "location" => input.location = value,
            "status" => input.status = value,
            "contact" => input.contact = Some(value),
            "reward" => input.reward = Some(value),
            "latitude" => input.latitude = Some(value),
            "longitude" => input.longitude = Some(value),
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }

    let listing = state.pet_service.create(&auth, input, uploads).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /pets/{id}
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PetDetails>> {
    let pet_id = parse_uuid(&id)?;
    let details = state.pet_service.details(pet_id).await?;
    Ok(Json(details))
}

/// GET /my-pets
pub async fn my_pets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<MyPetItem>>> {
    let items = state.pet_service.my_pets(&auth).await?;
    Ok(Json(items))
}

async fn read_image(field: Field<'_>) -> Result<ImageUpload, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field.bytes().await.map_err(multipart_error)?;
    Ok(ImageUpload {
        file_name,
        content_type,
        data,
    })
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Request body is too large")
    } else {
        AppError::validation(format!("Multipart error: {}", e.body_text()))
    }
}
