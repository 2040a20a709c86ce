//! `AuthUser` extractor: validates the bearer token and yields the caller's context.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use petfinder_auth::jwt::decoder::INVALID_TOKEN;
use petfinder_core::error::AppError;
use petfinder_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, available in handlers of protected routes.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::authentication("Token not provided"))?;

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication(INVALID_TOKEN))?;

        let claims = state.jwt_decoder.decode(token)?;

        Ok(AuthUser(RequestContext::from_claims(&claims)))
    }
}
