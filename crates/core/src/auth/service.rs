//! Orchestration of registration, login, and access-token regeneration.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::password::CredentialHasher;
use crate::session::{NewSession, SessionArtifact};
use crate::store::{SessionStore, UserStore};
use crate::token::TokenSigner;
use crate::types::DbId;
use crate::user::{CreateUser, NewUser, UserDetails, UserPatch};

/// Login input.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A successful login: the projection plus the paired tokens the client
/// must carry on subsequent requests.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: UserDetails,
    pub artifact: SessionArtifact,
}

/// Behavioral core of the account service.
///
/// Depends only on the store/hasher/signer/clock seams, never on a
/// concrete persistence client or transport.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn CredentialHasher>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    refresh_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn CredentialHasher>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
        refresh_ttl: chrono::Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            signer,
            clock,
            refresh_ttl,
        }
    }

    /// Register a new account.
    ///
    /// The plaintext password is hashed here, immediately before
    /// persistence; no store ever sees it.
    pub async fn register(&self, input: NewUser) -> Result<UserDetails, CoreError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(CoreError::Conflict("user already exists".into()));
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = self
            .users
            .create(CreateUser {
                name: input.name,
                email: input.email,
                password_hash,
                phone: input.phone,
                role: input.role,
            })
            .await?;

        tracing::info!(user_id = user.id, "registered new user");
        Ok(user.details())
    }

    /// Authenticate with email + password.
    ///
    /// This is the only path that mints a refresh token from credentials.
    /// Unknown accounts and wrong passwords are kept distinct internally
    /// (`Forbidden` vs `Unauthorized`); both carry the same generic text
    /// so responses do not reveal which part was wrong.
    pub async fn login(&self, credentials: Credentials) -> Result<LoginSession, CoreError> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| CoreError::Forbidden("invalid credentials".into()))?;

        let password_ok = self
            .verify_password(credentials.password, user.password_hash.clone())
            .await?;
        if !password_ok {
            return Err(CoreError::Unauthorized("invalid credentials".into()));
        }

        let now = self.clock.now();
        let details = user.details();
        let token = self.signer.sign(&details, now)?;
        let refresh_token = Uuid::new_v4().to_string();

        self.sessions
            .create(NewSession {
                user_id: user.id,
                refresh_token: refresh_token.clone(),
                refresh_token_exp: now + self.refresh_ttl,
            })
            .await?;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok(LoginSession {
            user: details,
            artifact: SessionArtifact {
                token,
                refresh_token,
            },
        })
    }

    /// Mint a fresh access token from a still-valid refresh token.
    ///
    /// Returns `Ok(None)` when the session is unknown or expired -- an
    /// expected outcome, not an error. The refresh token itself is left
    /// untouched and stays valid until its original expiry.
    pub async fn regenerate_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<String>, CoreError> {
        let now = self.clock.now();
        let Some(valid) = self.sessions.find_valid(refresh_token, now).await? else {
            return Ok(None);
        };
        let token = self.signer.sign(&valid.user.details(), now)?;
        Ok(Some(token))
    }

    /// Fetch a user's projection by id.
    pub async fn find_user(&self, id: DbId) -> Result<UserDetails, CoreError> {
        self.users
            .find_by_id(id)
            .await?
            .map(|u| u.details())
            .ok_or(CoreError::NotFound { entity: "user", id })
    }

    /// Apply a partial update and return the refreshed projection.
    pub async fn update_user(&self, id: DbId, patch: UserPatch) -> Result<UserDetails, CoreError> {
        self.users
            .update(id, patch)
            .await?
            .map(|u| u.details())
            .ok_or(CoreError::NotFound { entity: "user", id })
    }

    /// Remove sessions whose expiry has passed. Used by the periodic sweep.
    pub async fn purge_expired_sessions(&self) -> Result<u64, CoreError> {
        self.sessions.delete_expired(self.clock.now()).await
    }

    pub(crate) fn signer(&self) -> &dyn TokenSigner {
        self.signer.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Hashing is CPU-bound; run it on the blocking pool so it never
    /// stalls a runtime worker.
    async fn hash_password(&self, plaintext: String) -> Result<String, CoreError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| CoreError::Internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify_password(&self, plaintext: String, hash: String) -> Result<bool, CoreError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| CoreError::Internal(format!("Hashing task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use crate::clock::ManualClock;
    use crate::password::Argon2Hasher;
    use crate::store::memory::{InMemorySessionStore, InMemoryUserStore};
    use crate::token::JwtSigner;
    use crate::types::Timestamp;

    use super::*;

    const ACCESS_TTL_SECS: i64 = 10;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    struct Harness {
        service: AuthService,
        clock: Arc<ManualClock>,
        sessions: Arc<InMemorySessionStore>,
        signer: Arc<JwtSigner>,
    }

    fn harness() -> Harness {
        let users = Arc::new(InMemoryUserStore::default());
        let sessions = Arc::new(InMemorySessionStore::new(Arc::clone(&users)));
        let clock = Arc::new(ManualClock::new(t0()));
        let signer = Arc::new(JwtSigner::new(
            "test-secret-that-is-long-enough-for-hmac",
            Duration::seconds(ACCESS_TTL_SECS),
        ));
        let service = AuthService::new(
            users,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
            Arc::new(Argon2Hasher),
            Arc::clone(&signer) as Arc<dyn TokenSigner>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            Duration::days(7),
        );
        Harness {
            service,
            clock,
            sessions,
            signer,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada Lovelace".into(),
            email: email.into(),
            password: "p1-long-enough".into(),
            phone: "+36201234567".into(),
            role: "user".into(),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_returns_projection_without_password() {
        let h = harness();
        let details = h.service.register(new_user("a@x.com")).await.unwrap();

        assert_eq!(details.email, "a@x.com");
        assert_eq!(details.name, "Ada Lovelace");
        // The projection type has no password or id field at all; make sure
        // nothing password-shaped leaked into the role/phone either.
        assert_eq!(details.role, "user");
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();

        let err = h.service.register(new_user("a@x.com")).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[tokio::test]
    async fn login_mints_verifiable_access_token() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();

        let session = h
            .service
            .login(credentials("a@x.com", "p1-long-enough"))
            .await
            .unwrap();

        let decoded = h
            .signer
            .verify(&session.artifact.token, t0())
            .expect("freshly minted token should verify");
        assert_eq!(decoded, session.user);
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(h.sessions.session_count(), 1);
    }

    #[tokio::test]
    async fn login_unknown_email_is_forbidden() {
        let h = harness();
        let err = h
            .service
            .login(credentials("ghost@x.com", "whatever"))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Forbidden(_));
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized_and_creates_no_session() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();

        let err = h
            .service
            .login(credentials("a@x.com", "wrong-password"))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Unauthorized(_));
        assert_eq!(h.sessions.session_count(), 0);
    }

    #[tokio::test]
    async fn regeneration_is_repeatable_without_rotating_the_refresh_token() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();
        let session = h
            .service
            .login(credentials("a@x.com", "p1-long-enough"))
            .await
            .unwrap();
        let refresh_token = session.artifact.refresh_token;

        h.clock.advance(Duration::seconds(30));
        let first = h
            .service
            .regenerate_access_token(&refresh_token)
            .await
            .unwrap()
            .expect("refresh token should still be valid");
        let second = h
            .service
            .regenerate_access_token(&refresh_token)
            .await
            .unwrap()
            .expect("the same refresh token must stay usable");

        let now = h.clock.now();
        assert!(h.signer.verify(&first, now).is_ok());
        assert!(h.signer.verify(&second, now).is_ok());
        assert_eq!(h.sessions.session_count(), 1, "no new session rows");
    }

    #[tokio::test]
    async fn regeneration_after_refresh_expiry_yields_none() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();
        let session = h
            .service
            .login(credentials("a@x.com", "p1-long-enough"))
            .await
            .unwrap();

        h.clock.advance(Duration::days(7) + Duration::microseconds(1));
        let regenerated = h
            .service
            .regenerate_access_token(&session.artifact.refresh_token)
            .await
            .unwrap();
        assert!(regenerated.is_none(), "expired sessions are a normal miss");
    }

    #[tokio::test]
    async fn refresh_expiry_boundary_is_inclusive() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();
        let session = h
            .service
            .login(credentials("a@x.com", "p1-long-enough"))
            .await
            .unwrap();

        // Exactly at the stored expiry the session still counts as valid.
        h.clock.advance(Duration::days(7));
        let regenerated = h
            .service
            .regenerate_access_token(&session.artifact.refresh_token)
            .await
            .unwrap();
        assert!(regenerated.is_some());
    }

    #[tokio::test]
    async fn unknown_refresh_token_yields_none() {
        let h = harness();
        let regenerated = h
            .service
            .regenerate_access_token("no-such-token")
            .await
            .unwrap();
        assert!(regenerated.is_none());
    }

    #[tokio::test]
    async fn find_user_not_found() {
        let h = harness();
        let err = h.service.find_user(99).await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "user", id: 99 });
    }

    #[tokio::test]
    async fn update_user_patches_and_projects() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();

        let details = h
            .service
            .update_user(
                1,
                UserPatch {
                    name: Some("Grace Hopper".into()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(details.name, "Grace Hopper");
        assert_eq!(details.email, "a@x.com");

        let err = h
            .service
            .update_user(99, UserPatch::default())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn purge_removes_only_expired_sessions() {
        let h = harness();
        h.service.register(new_user("a@x.com")).await.unwrap();
        h.service
            .login(credentials("a@x.com", "p1-long-enough"))
            .await
            .unwrap();

        assert_eq!(h.service.purge_expired_sessions().await.unwrap(), 0);

        h.clock.advance(Duration::days(8));
        assert_eq!(h.service.purge_expired_sessions().await.unwrap(), 1);
        assert_eq!(h.sessions.session_count(), 0);
    }
}
