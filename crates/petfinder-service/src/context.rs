//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use petfinder_auth::jwt::Claims;

/// Context for the current authenticated request.
///
/// Built from the bearer token by the API layer and passed into service
/// methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Display name from the token.
    pub name: String,
    /// Email from the token.
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            request_time: Utc::now(),
        }
    }

    /// Creates a context from verified token claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.name.clone(), claims.email.clone())
    }
}
