//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A per-user inbox entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Trigger.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Client-side route to open, e.g. `/pet/<id>`.
    pub link: Option<String>,
    /// Whether the recipient has read it.
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    /// Recipient.
    pub user_id: Uuid,
    /// Trigger.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body.
    pub message: String,
    /// Route.
    pub link: Option<String>,
}

impl CreateNotification {
    /// Notification telling a listing owner about a new sighting.
    pub fn sighting(owner_id: Uuid, pet_id: Uuid, pet_name: &str) -> Self {
        Self {
            user_id: owner_id,
            kind: NotificationKind::Sighting,
            title: format!("New lead on {pet_name}!"),
            message: "Someone reported seeing your pet nearby. Open the map to check.".to_string(),
            link: Some(format!("/pet/{pet_id}")),
        }
    }

    /// Notification thanking the finder credited on a resolved listing.
    pub fn resolution(finder_id: Uuid, pet_id: Uuid, pet_name: &str) -> Self {
        Self {
            user_id: finder_id,
            kind: NotificationKind::Resolution,
            title: format!("Thanks for helping {pet_name}!"),
            message: "The owner marked this listing as resolved and credited you.".to_string(),
            link: Some(format!("/pet/{pet_id}")),
        }
    }
}
