//! User row model.

use sqlx::FromRow;
use warden_core::types::{DbId, Timestamp};
use warden_core::user::User;

/// A row from the `users` table.
///
/// Carries the password hash; conversion into the domain [`User`] keeps it
/// inside the core boundary, where only the hasher ever reads it.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
