//! Handlers for the `/users` resource (registration, profile read/update).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use warden_core::error::CoreError;
use warden_core::types::DbId;
use warden_core::user::{NewUser, UserDetails, UserPatch};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Minimum password length enforced on registration.
const MIN_PASSWORD_LENGTH: usize = 8;

/// POST /api/v1/users
///
/// Register a new account. Returns the safe projection with 201 Created.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> AppResult<(StatusCode, Json<UserDetails>)> {
    if input.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ))));
    }

    let details = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserDetails>> {
    let details = state.auth.find_user(id).await?;
    Ok(Json(details))
}

/// PATCH /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UserPatch>,
) -> AppResult<Json<UserDetails>> {
    let details = state.auth.update_user(id, patch).await?;
    Ok(Json(details))
}

/// GET /api/v1/users/me
///
/// Guarded: returns the authenticated user's projection. Renewal happens
/// transparently in the middleware when the access token has expired.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDetails> {
    Json(user)
}
