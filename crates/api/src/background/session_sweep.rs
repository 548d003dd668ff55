//! Periodic purge of expired refresh-token sessions.
//!
//! Sessions are append-only and enforced by read-time expiry comparison,
//! so expired rows accumulate as dead weight. This task deletes them on a
//! fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use warden_core::auth::AuthService;

/// How often the sweep runs by default (seconds).
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Run the session sweep loop until `cancel` is triggered.
///
/// The interval can be overridden via `SESSION_SWEEP_INTERVAL_SECS`.
pub async fn run(auth: Arc<AuthService>, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(interval_secs, "Session sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match auth.purge_expired_sessions().await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session sweep: purged expired sessions");
                        } else {
                            tracing::debug!("Session sweep: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session sweep: purge failed");
                    }
                }
            }
        }
    }
}
