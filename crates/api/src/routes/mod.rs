//! Route tree for the API.

pub mod auth;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login       login (public)
/// /auth/refresh     exchange the refresh token (public, cookie-driven)
///
/// /users            register (public)
/// /users/me         current user (guarded, renews transparently)
/// /users/{id}       get, patch
/// ```
///
/// Takes the state because the session guard is mounted per-route via
/// `from_fn_with_state`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router(state))
}
