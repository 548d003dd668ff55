//! `warden-core` store traits implemented over Postgres.

use async_trait::async_trait;
use warden_core::error::CoreError;
use warden_core::session::{NewSession, Session, ValidSession};
use warden_core::store::{SessionStore, UserStore};
use warden_core::types::{DbId, Timestamp};
use warden_core::user::{CreateUser, User, UserPatch};

use crate::repositories::{SessionRepo, UserRepo};
use crate::DbPool;

/// Map a sqlx failure into the core storage fault.
fn storage_error(err: sqlx::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: CreateUser) -> Result<User, CoreError> {
        UserRepo::create(&self.pool, &input)
            .await
            .map(Into::into)
            .map_err(storage_error)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(storage_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        UserRepo::find_by_email(&self.pool, email)
            .await
            .map(|row| row.map(Into::into))
            .map_err(storage_error)
    }

    async fn update(&self, id: DbId, patch: UserPatch) -> Result<Option<User>, CoreError> {
        UserRepo::update(&self.pool, id, &patch)
            .await
            .map(|row| row.map(Into::into))
            .map_err(storage_error)
    }
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, input: NewSession) -> Result<Session, CoreError> {
        SessionRepo::create(&self.pool, &input)
            .await
            .map(Into::into)
            .map_err(storage_error)
    }

    async fn find_valid(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> Result<Option<ValidSession>, CoreError> {
        SessionRepo::find_valid(&self.pool, refresh_token, now)
            .await
            .map(|row| row.map(Into::into))
            .map_err(storage_error)
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError> {
        SessionRepo::delete_expired(&self.pool, now)
            .await
            .map_err(storage_error)
    }
}
