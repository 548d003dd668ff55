use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use warden_api::config::{AuthConfig, ServerConfig};
use warden_api::routes;
use warden_api::state::AppState;
use warden_core::auth::AuthService;
use warden_core::clock::{Clock, ManualClock};
use warden_core::password::Argon2Hasher;
use warden_core::session::SessionArtifact;
use warden_core::store::memory::{InMemorySessionStore, InMemoryUserStore};
use warden_core::token::JwtSigner;

/// Access-token lifetime used across the integration tests. Short enough
/// that the manual clock can cross it without awkward arithmetic.
pub const ACCESS_TTL_SECS: i64 = 10;

/// The instant the test clock starts at.
pub fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        auth: AuthConfig {
            jwt_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_ttl_secs: ACCESS_TTL_SECS,
            refresh_token_ttl_days: 7,
            cookie_secure: false,
        },
    }
}

/// Build the full application router with the production middleware stack,
/// backed by in-memory stores and a manual clock.
///
/// Returns the router plus the clock handle so tests can fast-forward
/// time across token lifetimes.
pub fn build_test_app() -> (Router, Arc<ManualClock>) {
    let config = test_config();
    let clock = Arc::new(ManualClock::new(t0()));

    let users = Arc::new(InMemoryUserStore::default());
    let sessions = Arc::new(InMemorySessionStore::new(Arc::clone(&users)));
    let signer = JwtSigner::new(
        &config.auth.jwt_secret,
        chrono::Duration::seconds(config.auth.access_token_ttl_secs),
    );
    let auth = Arc::new(AuthService::new(
        users,
        sessions,
        Arc::new(Argon2Hasher),
        Arc::new(signer),
        Arc::clone(&clock) as Arc<dyn Clock>,
        chrono::Duration::days(config.auth.refresh_token_ttl_days),
    ));

    let state = AppState {
        auth,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (app, clock)
}

/// POST a JSON body, returning the raw response.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with no body but with a `Cookie` header.
pub async fn post_with_cookies(app: Router, uri: &str, cookies: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Plain GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET with a `Cookie` header.
pub async fn get_with_cookies(app: Router, uri: &str, cookies: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookies)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// PATCH a JSON body.
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Consume a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

/// Collect the session cookie pairs from a response's `Set-Cookie` headers
/// into a single `Cookie` request-header value.
pub fn session_cookie_header(response: &Response<Body>) -> String {
    let pairs: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_string())
        .collect();
    assert!(!pairs.is_empty(), "response should set session cookies");
    pairs.join("; ")
}

/// Parse the session artifact out of a response's `Set-Cookie` headers.
pub fn artifact_from_response(response: &Response<Body>) -> SessionArtifact {
    let mut token = None;
    let mut refresh_token = None;
    for value in response.headers().get_all(SET_COOKIE) {
        let pair = value.to_str().unwrap().split(';').next().unwrap();
        if let Some(v) = pair.strip_prefix("auth-token=") {
            token = Some(v.to_string());
        } else if let Some(v) = pair.strip_prefix("auth-refresh=") {
            refresh_token = Some(v.to_string());
        }
    }
    SessionArtifact {
        token: token.expect("response should set the auth-token cookie"),
        refresh_token: refresh_token.expect("response should set the auth-refresh cookie"),
    }
}

/// Register a user through the API. Panics on non-201 responses.
pub async fn register_user(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "name": "Ada Lovelace",
        "email": email,
        "password": password,
        "phone": "+36201234567",
        "role": "user",
    });
    let response = post_json(app, "/api/v1/users", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in through the API, returning the response for cookie inspection.
pub async fn login_user(app: Router, email: &str, password: &str) -> Response<Body> {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    response
}
