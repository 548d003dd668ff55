//! User entity and its external projection.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Full user record.
///
/// Contains the password hash -- NEVER serialize this outward. Every
/// external surface works with [`UserDetails`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Trim the record down to the fields safe for external exposure.
    pub fn details(&self) -> UserDetails {
        UserDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role.clone(),
        }
    }
}

/// Public projection of a [`User`]: no id, no password hash.
///
/// This is the only user-shaped value that enters an access token or is
/// returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

/// Registration input. The password is plaintext here; the auth service
/// hashes it immediately before persistence and it travels no further.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: String,
}

/// Store-level insert DTO. Only ever carries the hashed password.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
}

/// Partial update. `None` fields are left untouched. Passwords are not
/// updatable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}
