//! Notification inbox operations.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use petfinder_core::result::AppResult;
use petfinder_database::repositories::NotificationRepository;
use petfinder_entity::notification::Notification;

use crate::context::RequestContext;

/// Reads and acknowledges the current user's notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Lists the current user's notifications, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Notification>> {
        self.notifications.find_by_user(ctx.user_id).await
    }

    /// Counts unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks one notification as read.
    ///
    /// Succeeds whether or not the notification exists or belongs to the
    /// caller, so IDs cannot be probed.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        let updated = self
            .notifications
            .mark_read(notification_id, ctx.user_id)
            .await?;
        if !updated {
            debug!(notification_id = %notification_id, user_id = %ctx.user_id, "mark_read matched nothing");
        }
        Ok(())
    }

    /// Marks every notification as read; returns how many changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.mark_all_read(ctx.user_id).await
    }
}
