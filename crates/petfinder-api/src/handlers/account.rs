//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use petfinder_entity::user::User;
use petfinder_service::LoginSession;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.account_service.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginSession>> {
    let session = state
        .account_service
        .login(&req.email, &req.password)
        .await?;
    Ok(Json(session))
}
