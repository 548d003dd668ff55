//! Access-token signing and verification.
//!
//! Access tokens are HS256-signed JWTs whose claims are the flattened
//! [`UserDetails`] plus issued-at and expiry. They are stateless: never
//! persisted, and validity is entirely signature + expiry at verification
//! time.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::user::UserDetails;

/// Verification failure.
///
/// This is expected control flow -- it is what routes a request into the
/// refresh path -- so it carries no detail and costs nothing to construct.
/// A bad signature and an elapsed expiry are deliberately
/// indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("access token signature or expiry is invalid")]
    Invalid,
}

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    user: UserDetails,
    /// Issued-at (UTC Unix timestamp).
    iat: i64,
    /// Expiration (UTC Unix timestamp).
    exp: i64,
}

/// Stateless signing/verification of short-lived access tokens.
pub trait TokenSigner: Send + Sync {
    /// Sign `details` into a compact token issued at `now`.
    fn sign(&self, details: &UserDetails, now: Timestamp) -> Result<String, CoreError>;

    /// Verify signature and expiry, returning the embedded projection.
    ///
    /// Cheap and side-effect-free: failure here is the normal trigger for
    /// the refresh flow, not an exceptional condition.
    fn verify(&self, token: &str, now: Timestamp) -> Result<UserDetails, TokenError>;
}

/// HS256 signer.
///
/// The expiry claim is checked against the caller-supplied instant rather
/// than the process clock, keeping token lifetimes testable.
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
    validation: Validation,
}

impl JwtSigner {
    /// Build a signer from the shared secret and access-token lifetime.
    pub fn new(secret: &str, ttl: chrono::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared manually against the injected clock.
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, details: &UserDetails, now: Timestamp) -> Result<String, CoreError> {
        let claims = Claims {
            user: details.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CoreError::Internal(format!("Token signing error: {e}")))
    }

    fn verify(&self, token: &str, now: Timestamp) -> Result<UserDetails, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        if data.claims.exp < now.timestamp() {
            return Err(TokenError::Invalid);
        }
        Ok(data.claims.user)
    }
}
