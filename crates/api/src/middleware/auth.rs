//! Cookie-based session guard for protected routes.
//!
//! Extracts the session artifact from its cookies, evaluates the access
//! guard, and on transparent renewal attaches updated cookies to the
//! response. The request proceeds with the authenticated [`UserDetails`]
//! available as an extension (see [`CurrentUser`]).

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use warden_core::auth::{evaluate, GuardOutcome};
use warden_core::error::CoreError;
use warden_core::session::SessionArtifact;
use warden_core::user::UserDetails;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie carrying the signed access token.
pub const ACCESS_COOKIE: &str = "auth-token";

/// Cookie carrying the opaque refresh token.
pub const REFRESH_COOKIE: &str = "auth-refresh";

/// Read the session artifact from the cookie jar.
///
/// Both cookies must be present; a missing pair yields `None`, which the
/// guard treats as a failed verification rather than a fault.
pub fn read_artifact(jar: &CookieJar) -> Option<SessionArtifact> {
    let token = jar.get(ACCESS_COOKIE)?.value().to_string();
    let refresh_token = jar.get(REFRESH_COOKIE)?.value().to_string();
    Some(SessionArtifact {
        token,
        refresh_token,
    })
}

/// Add both session cookies for an artifact to the jar.
///
/// Always `HttpOnly`; the `Secure` flag follows configuration.
pub fn with_session_cookies(
    jar: CookieJar,
    artifact: &SessionArtifact,
    config: &ServerConfig,
) -> CookieJar {
    let build = |name: &'static str, value: String| {
        Cookie::build((name, value))
            .http_only(true)
            .secure(config.auth.cookie_secure)
            .path("/")
            .build()
    };
    jar.add(build(ACCESS_COOKIE, artifact.token.clone()))
        .add(build(REFRESH_COOKIE, artifact.refresh_token.clone()))
}

/// Authenticated user for guarded handlers, inserted by
/// [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserDetails);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserDetails>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("authentication required".into()))
            })
    }
}

/// Middleware gating protected routes on a valid session artifact.
///
/// Verification failure on the access token falls back to the refresh
/// token; when that succeeds the renewed artifact is set on the response
/// so the client keeps an up-to-date cookie without re-authenticating.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let artifact = read_artifact(&jar);

    match evaluate(&state.auth, artifact.as_ref()).await? {
        GuardOutcome::Allow(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        GuardOutcome::AllowRenewed { user, artifact } => {
            tracing::debug!(email = %user.email, "access token renewed in-flight");
            request.extensions_mut().insert(user);
            let jar = with_session_cookies(jar, &artifact, &state.config);
            let response = next.run(request).await;
            Ok((jar, response).into_response())
        }
        GuardOutcome::Deny => Err(AppError::Core(CoreError::Unauthorized(
            "invalid or expired session".into(),
        ))),
    }
}
