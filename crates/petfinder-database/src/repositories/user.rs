//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use petfinder_core::error::{AppError, ErrorKind};
use petfinder_core::result::AppResult;
use petfinder_core::types::pagination::{PageRequest, PageResponse};
use petfinder_entity::user::{CreateUser, UpdateProfile, User};

use super::db_err;

/// Storage operations on accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fetch several users at once. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;

    /// Apply profile changes. Returns `None` when the user does not exist.
    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;
}

/// PostgreSQL-backed [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                AppError::with_source(ErrorKind::Conflict, "User already exists", e)
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create user", e)
            }
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by email"))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to load users"))
    }

    async fn update_profile(&self, id: Uuid, data: UpdateProfile) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                city = COALESCE($4, city), \
                state = COALESCE($5, state), \
                updated_at = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.city)
        .bind(&data.state)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update profile"))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }
}
