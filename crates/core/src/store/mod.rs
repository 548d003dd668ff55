//! Storage seams consumed by the auth service.
//!
//! The service depends only on these traits. `warden-db` provides the
//! Postgres implementations; [`memory`] provides an in-memory pair for
//! tests and local development.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::session::{NewSession, Session, ValidSession};
use crate::types::{DbId, Timestamp};
use crate::user::{CreateUser, User, UserPatch};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning the created record.
    async fn create(&self, input: CreateUser) -> Result<User, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// Apply a patch. Returns `None` if no user with `id` exists.
    async fn update(&self, id: DbId, patch: UserPatch) -> Result<Option<User>, CoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session row. Fails with [`CoreError::Storage`] if the
    /// owning user does not exist.
    async fn create(&self, input: NewSession) -> Result<Session, CoreError>;

    /// Look up a session by refresh token, returning it (with its owning
    /// user) only while `refresh_token_exp >= now`. The comparison is
    /// inclusive of the current instant.
    async fn find_valid(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> Result<Option<ValidSession>, CoreError>;

    /// Delete sessions whose expiry is strictly in the past. Returns the
    /// number of rows removed.
    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError>;
}
