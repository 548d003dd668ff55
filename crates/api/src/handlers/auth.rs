//! Handlers for the `/auth` resource (login, refresh).

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use warden_core::auth::Credentials;
use warden_core::error::CoreError;
use warden_core::session::SessionArtifact;
use warden_core::user::UserDetails;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{read_artifact, with_session_cookies};
use crate::state::AppState;

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. On success the paired tokens are
/// set as HTTP-only cookies and the user projection is returned.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<Credentials>,
) -> AppResult<(CookieJar, Json<UserDetails>)> {
    let session = state.auth.login(input).await?;
    let jar = with_session_cookies(jar, &session.artifact, &state.config);
    Ok((jar, Json(session.user)))
}

/// POST /api/v1/auth/refresh
///
/// Exchange the carried refresh token for a fresh access token. The
/// refresh token itself is reused as-is until its original expiry.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<SessionArtifact>)> {
    let artifact = read_artifact(&jar).ok_or_else(invalid_refresh)?;

    let token = state
        .auth
        .regenerate_access_token(&artifact.refresh_token)
        .await?
        .ok_or_else(invalid_refresh)?;

    let renewed = SessionArtifact {
        token,
        refresh_token: artifact.refresh_token,
    };
    let jar = with_session_cookies(jar, &renewed, &state.config);
    Ok((jar, Json(renewed)))
}

fn invalid_refresh() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "invalid or expired refresh token".into(),
    ))
}
