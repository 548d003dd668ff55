//! The request-time gate: verify the access token, silently renew via the
//! refresh token when verification fails, deny otherwise.

use crate::error::CoreError;
use crate::session::SessionArtifact;
use crate::user::UserDetails;

use super::service::AuthService;

/// Result of evaluating the guard for one request.
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    /// The access token verified; let the request through.
    Allow(UserDetails),
    /// The access token failed but the refresh token was still valid: let
    /// the request through and hand the caller a renewed artifact (same
    /// refresh token, fresh access token) to re-persist client-side.
    AllowRenewed {
        user: UserDetails,
        artifact: SessionArtifact,
    },
    /// No artifact, or both tokens failed. The request must not proceed.
    Deny,
}

/// Evaluate the guard against the artifact carried by a request.
///
/// A missing artifact is equivalent to a failed verification: the outcome
/// is [`GuardOutcome::Deny`], never a fault. A malformed access token and
/// a merely expired one are deliberately indistinguishable; both route
/// into the refresh attempt, which is the sole recovery mechanism.
/// Storage faults do propagate -- they are not access decisions.
pub async fn evaluate(
    service: &AuthService,
    artifact: Option<&SessionArtifact>,
) -> Result<GuardOutcome, CoreError> {
    let Some(artifact) = artifact else {
        return Ok(GuardOutcome::Deny);
    };

    let now = service.clock().now();
    if let Ok(user) = service.signer().verify(&artifact.token, now) {
        return Ok(GuardOutcome::Allow(user));
    }

    let Some(token) = service
        .regenerate_access_token(&artifact.refresh_token)
        .await?
    else {
        return Ok(GuardOutcome::Deny);
    };

    // The token was minted a moment ago; decode it back for the caller's
    // identity rather than touching the store a second time.
    let Ok(user) = service.signer().verify(&token, now) else {
        return Ok(GuardOutcome::Deny);
    };

    Ok(GuardOutcome::AllowRenewed {
        user,
        artifact: SessionArtifact {
            token,
            refresh_token: artifact.refresh_token.clone(),
        },
    })
}
