//! Route definitions for the `/users` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::middleware::auth::require_session;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST  /        -> register
/// GET   /me      -> current user (guarded)
/// GET   /{id}    -> fetch projection
/// PATCH /{id}    -> partial update
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    let guarded = Router::new()
        .route("/me", get(users::me))
        .route_layer(from_fn_with_state(state, require_session));

    Router::new()
        .route("/", post(users::register))
        .route("/{id}", get(users::get_user).patch(users::update_user))
        .merge(guarded)
}
