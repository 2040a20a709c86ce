//! Serves stored listing photos.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use petfinder_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /uploads/{*key}
pub async fn serve(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult<Response> {
    let object = state.upload_service.open(&key).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type)
        .header(header::CONTENT_LENGTH, object.size_bytes)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from_stream(object.body))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
