//! Repository for the `sessions` table.

use sqlx::PgPool;
use warden_core::session::NewSession;
use warden_core::types::Timestamp;

use crate::models::session::{SessionRow, SessionWithUserRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, refresh_token, refresh_token_exp, user_id, created_at";

/// Provides CRUD operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<SessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (refresh_token, refresh_token_exp, user_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(&input.refresh_token)
            .bind(input.refresh_token_exp)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a session by refresh token together with its owning user.
    ///
    /// Only returns sessions whose expiry has not passed; the comparison
    /// is inclusive of `now`. The user is loaded eagerly because every
    /// caller needs it immediately.
    pub async fn find_valid(
        pool: &PgPool,
        refresh_token: &str,
        now: Timestamp,
    ) -> Result<Option<SessionWithUserRow>, sqlx::Error> {
        sqlx::query_as::<_, SessionWithUserRow>(
            "SELECT s.id, s.refresh_token, s.refresh_token_exp, s.user_id, s.created_at,
                    u.id AS u_id, u.name AS u_name, u.email AS u_email,
                    u.password_hash AS u_password_hash, u.phone AS u_phone, u.role AS u_role,
                    u.created_at AS u_created_at, u.updated_at AS u_updated_at
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.refresh_token = $1
               AND s.refresh_token_exp >= $2",
        )
        .bind(refresh_token)
        .bind(now)
        .fetch_optional(pool)
        .await
    }

    /// Delete sessions that expired before `now`. Returns the count of
    /// deleted rows.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token_exp < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
