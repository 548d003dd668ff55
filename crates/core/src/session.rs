//! Refresh-token session records and the client-carried artifact.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};
use crate::user::User;

/// A persisted refresh-token session.
///
/// Append-only: rows are created on login and never mutated; expiry is
/// enforced by comparison at read time.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: DbId,
    pub refresh_token: String,
    pub refresh_token_exp: Timestamp,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Insert DTO for a new session row.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: DbId,
    pub refresh_token: String,
    pub refresh_token_exp: Timestamp,
}

/// A session together with its owning user, loaded eagerly because every
/// caller needs the user immediately.
#[derive(Debug, Clone)]
pub struct ValidSession {
    pub session: Session,
    pub user: User,
}

/// The paired tokens carried by the client between requests.
///
/// Serialized with camelCase field names (`token`, `refreshToken`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionArtifact {
    /// Short-lived signed access token.
    pub token: String,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
}
