/// Authentication configuration (signing secret, token lifetimes, cookie
/// flags).
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 900).
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_ttl_days: i64,
    /// Whether the session cookies carry the `Secure` flag (default: false).
    pub cookie_secure: bool,
}

/// Default access token lifetime in seconds.
const DEFAULT_ACCESS_TTL_SECS: i64 = 900;
/// Default refresh token lifetime in days.
const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

impl AuthConfig {
    /// Load authentication configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `ACCESS_TOKEN_TTL_SECS`  | no       | `900`   |
    /// | `REFRESH_TOKEN_TTL_DAYS` | no       | `7`     |
    /// | `COOKIE_SECURE`          | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let jwt_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_ttl_secs: i64 = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_SECS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_SECS must be a valid i64");

        let refresh_token_ttl_days: i64 = std::env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_TTL_DAYS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_TTL_DAYS must be a valid i64");

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be `true` or `false`");

        Self {
            jwt_secret,
            access_token_ttl_secs,
            refresh_token_ttl_days,
            cookie_secure,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the signing secret have sensible defaults suitable
/// for local development. In production, override via environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Authentication configuration (secret, lifetimes, cookie flags).
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let auth = AuthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            auth,
        }
    }
}
