use std::sync::Arc;

use warden_core::auth::AuthService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The behavioral core: registration, login, renewal.
    pub auth: Arc<AuthService>,
    /// Server configuration (cookie flags, timeouts).
    pub config: Arc<ServerConfig>,
}
