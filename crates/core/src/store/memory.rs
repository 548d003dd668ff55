//! In-memory store implementations.
//!
//! Used by tests and local development; the Postgres implementations in
//! `warden-db` are the production backends. Semantics mirror the database
//! schema: unique emails, unique refresh tokens, and a mandatory owning
//! user per session.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::CoreError;
use crate::session::{NewSession, Session, ValidSession};
use crate::store::{SessionStore, UserStore};
use crate::types::{DbId, Timestamp};
use crate::user::{CreateUser, User, UserPatch};

#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<Table<User>>,
}

/// Session rows plus a handle to the user table, standing in for the
/// ownership foreign key.
pub struct InMemorySessionStore {
    users: Arc<InMemoryUserStore>,
    inner: Mutex<Table<Session>>,
}

/// Rows plus a BIGSERIAL-style id counter.
struct Table<T> {
    rows: Vec<T>,
    next_id: DbId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, input: CreateUser) -> Result<User, CoreError> {
        let mut table = self.inner.lock().unwrap();
        if table.rows.iter().any(|u| u.email == input.email) {
            return Err(CoreError::Storage(format!(
                "duplicate key value violates unique constraint on email: {}",
                input.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: table.allocate_id(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            phone: input.phone,
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let table = self.inner.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: DbId, patch: UserPatch) -> Result<Option<User>, CoreError> {
        let mut table = self.inner.lock().unwrap();
        let Some(user) = table.rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

impl InMemorySessionStore {
    pub fn new(users: Arc<InMemoryUserStore>) -> Self {
        Self {
            users,
            inner: Mutex::new(Table::default()),
        }
    }

    /// Number of stored sessions, expired ones included.
    pub fn session_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, input: NewSession) -> Result<Session, CoreError> {
        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(CoreError::Storage(format!(
                "foreign key violation: no user with id {}",
                input.user_id
            )));
        }

        let mut table = self.inner.lock().unwrap();
        if table
            .rows
            .iter()
            .any(|s| s.refresh_token == input.refresh_token)
        {
            return Err(CoreError::Storage(
                "duplicate key value violates unique constraint on refresh_token".into(),
            ));
        }
        let session = Session {
            id: table.allocate_id(),
            refresh_token: input.refresh_token,
            refresh_token_exp: input.refresh_token_exp,
            user_id: input.user_id,
            created_at: Utc::now(),
        };
        table.rows.push(session.clone());
        Ok(session)
    }

    async fn find_valid(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> Result<Option<ValidSession>, CoreError> {
        let session = {
            let table = self.inner.lock().unwrap();
            table
                .rows
                .iter()
                .find(|s| s.refresh_token == refresh_token && s.refresh_token_exp >= now)
                .cloned()
        };
        let Some(session) = session else {
            return Ok(None);
        };

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| {
                CoreError::Storage(format!("session {} has no owning user", session.id))
            })?;
        Ok(Some(ValidSession { session, user }))
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError> {
        let mut table = self.inner.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|s| s.refresh_token_exp >= now);
        Ok((before - table.rows.len()) as u64)
    }
}
