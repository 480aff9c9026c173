use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Role;

/// Stored account
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Data for creating an account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Account persistence used by registration and login
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with `Conflict` when the username is taken.
    async fn create(&self, user: &NewUser) -> Result<UserRecord>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("User already exists".to_string())
            }
            e => {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find user: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[derive(Default)]
struct MemoryUsers {
    next_id: i64,
    by_username: HashMap<String, UserRecord>,
}

/// Process-local account store
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<MemoryUsers>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &NewUser) -> Result<UserRecord> {
        let mut inner = self.inner.lock().await;
        if inner.by_username.contains_key(&user.username) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        inner.next_id += 1;
        let record = UserRecord {
            id: inner.next_id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
        };
        inner
            .by_username
            .insert(record.username.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self.inner.lock().await.by_username.get(username).cloned())
    }
}
