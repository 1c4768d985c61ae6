use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, UniqueField, User},
};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    next_id: i64,
}

/// Process-local user store. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Table) -> T) -> T {
        let guard = self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read(|t| t.rows.iter().find(|u| u.username == username).cloned()))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.read(|t| t.rows.iter().any(|u| u.username == username)))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.read(|t| t.rows.iter().any(|u| u.email == email)))
    }

    async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
        let mut table = self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner());

        if table.rows.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if table.rows.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: new_user.username.to_owned(),
            email: new_user.email.to_owned(),
            password_hash: new_user.password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }
}
