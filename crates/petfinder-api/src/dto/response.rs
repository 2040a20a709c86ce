//! Response DTOs that are not domain rows.

use serde::{Deserialize, Serialize};

/// GET /notifications/unread-count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Unread notifications.
    pub count: i64,
}

/// PATCH /notifications/read-all
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Notifications that changed state.
    pub marked: u64,
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when a dependency is unhealthy.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database status: `ok`, `memory` or `unavailable`.
    pub database: String,
}
