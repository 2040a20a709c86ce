//! Notification repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use petfinder_core::result::AppResult;
use petfinder_entity::notification::{CreateNotification, Notification};

use super::db_err;

/// Storage operations on the per-user inbox.
#[async_trait]
pub trait NotificationRepository: Send + Sync + std::fmt::Debug {
    /// Create a notification.
    async fn create(&self, data: CreateNotification) -> AppResult<Notification>;

    /// All notifications of a user, newest first.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Count unread notifications for a user.
    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;

    /// Mark one notification as read. Only matches rows owned by `user_id`.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Mark every unread notification of a user as read. Returns the count.
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
}

/// PostgreSQL-backed [`NotificationRepository`].
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, data: CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, kind, title, message, link) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.kind)
        .bind(&data.title)
        .bind(&data.message)
        .bind(&data.link)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create notification"))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list notifications"))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count unread notifications"))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(db_err("Failed to mark notification read"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to mark notifications read"))?;
        Ok(result.rows_affected())
    }
}
