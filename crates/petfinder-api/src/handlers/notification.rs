//! Notification inbox handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use petfinder_entity::notification::Notification;

use crate::dto::response::{CountResponse, MarkedResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// GET /notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    let items = state.notification_service.list(&auth).await?;
    Ok(Json(items))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(CountResponse { count }))
}

/// PATCH /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_uuid(&id)?;
    state.notification_service.mark_read(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MarkedResponse>> {
    let marked = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(MarkedResponse { marked }))
}
