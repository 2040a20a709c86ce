//! Account registration and login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use petfinder_auth::jwt::JwtEncoder;
use petfinder_auth::password::{PasswordHasher, PasswordValidator};
use petfinder_core::error::AppError;
use petfinder_core::result::AppResult;
use petfinder_core::types::pagination::{PageRequest, PageResponse};
use petfinder_database::repositories::UserRepository;
use petfinder_entity::user::{CreateUser, User};

use crate::validation;

/// Same message for unknown email and wrong password.
const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Data submitted by the sign-up form.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Bearer token.
    pub token: String,
}

/// Handles account creation and credential checks.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        encoder: JwtEncoder,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
        }
    }

    /// Registers a new account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        self.validator
            .validate_confirmation(&input.password, &input.confirm_password)?;
        let name = validation::required(&input.name, "name")?;
        let email = validation::email(&input.email)?;
        self.validator.validate(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user = self
            .users
            .create(CreateUser {
                name,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginSession> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            debug!("Login for unknown email");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        }

        let issued = self.encoder.issue(user.id, &user.name, &user.email)?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "User logged in");

        Ok(LoginSession {
            id: user.id,
            name: user.name,
            email: user.email,
            token: issued.token,
        })
    }

    /// Lists accounts for administration.
    pub async fn list_users(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        self.users.list(page).await
    }
}
