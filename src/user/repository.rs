use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for credential store operations
///
/// `insert_user` must reject a duplicate username or email with `AppError::Conflict`
/// on its own; callers pre-check only to produce friendlier messages.
#[async_trait]
pub trait UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>, // keyed by username
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated users
    pub fn with_users(users: Vec<UserModel>) -> Self {
        let mut user_map = HashMap::new();
        for user in users {
            user_map.insert(user.username.clone(), user);
        }

        Self {
            users: Mutex::new(user_map),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!(username = %username, "Fetching user by username from memory");

        let users = self.users.lock().unwrap();
        Ok(users.get(username).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from memory");

        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(username = %user.username, "Inserting user in memory");

        // Both checks and the insert happen under one lock, so this is atomic
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            warn!(username = %user.username, "Username already exists in memory");
            return Err(AppError::Conflict("Username already registered".to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already exists in memory");
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        users.insert(user.username.clone(), user.clone());

        debug!(username = %user.username, "User inserted successfully in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of the credential store
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        debug!(username = %username, "Fetching user by username from database");

        sqlx::query_as::<_, UserModel>(
            "SELECT username, email, full_name, hashed_password, disabled FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %username, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        debug!(email = %email, "Fetching user by email from database");

        sqlx::query_as::<_, UserModel>(
            "SELECT username, email, full_name, hashed_password, disabled FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, email = %email, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, user))]
    async fn insert_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(username = %user.username, "Inserting user in database");

        sqlx::query(
            "INSERT INTO users (username, email, full_name, hashed_password, disabled) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.hashed_password)
        .bind(user.disabled)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, username = %user.username, "Failed to insert user in database");
            match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Username or email already registered".to_string())
                }
                _ => AppError::DatabaseError(e.to_string()),
            }
        })?;

        debug!(username = %user.username, "User inserted successfully in database");
        Ok(())
    }
}
