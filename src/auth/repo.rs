use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, UniqueField, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Conflict(UniqueField),
    #[error("user store query failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records.
///
/// Implementations must make `insert` atomic with respect to the username
/// and email uniqueness checks: two concurrent inserts with the same
/// username cannot both succeed.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError>;
}

/// PostgreSQL adapter; uniqueness comes from the table constraints.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#)
                .bind(username)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => return StoreError::Conflict(UniqueField::Username),
                Some("users_email_key") => return StoreError::Conflict(UniqueField::Email),
                _ => {}
            }
        }
    }
    StoreError::Database(err)
}
