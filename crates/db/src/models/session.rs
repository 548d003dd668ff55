//! Session row models.

use sqlx::FromRow;
use warden_core::session::{Session, ValidSession};
use warden_core::types::{DbId, Timestamp};
use warden_core::user::User;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub refresh_token: String,
    pub refresh_token_exp: Timestamp,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            refresh_token: row.refresh_token,
            refresh_token_exp: row.refresh_token_exp,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// A `sessions` row joined with its owning user, as produced by
/// `SessionRepo::find_valid`. User columns are aliased with a `u_` prefix.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithUserRow {
    pub id: DbId,
    pub refresh_token: String,
    pub refresh_token_exp: Timestamp,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub u_id: DbId,
    pub u_name: String,
    pub u_email: String,
    pub u_password_hash: String,
    pub u_phone: String,
    pub u_role: String,
    pub u_created_at: Timestamp,
    pub u_updated_at: Timestamp,
}

impl From<SessionWithUserRow> for ValidSession {
    fn from(row: SessionWithUserRow) -> Self {
        ValidSession {
            session: Session {
                id: row.id,
                refresh_token: row.refresh_token,
                refresh_token_exp: row.refresh_token_exp,
                user_id: row.user_id,
                created_at: row.created_at,
            },
            user: User {
                id: row.u_id,
                name: row.u_name,
                email: row.u_email,
                password_hash: row.u_password_hash,
                phone: row.u_phone,
                role: row.u_role,
                created_at: row.u_created_at,
                updated_at: row.u_updated_at,
            },
        }
    }
}
