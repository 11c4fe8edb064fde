use knitlog_core::project::ChildWritePolicy;

/// Default request body ceiling. Photos and PDFs arrive as data URIs inside
/// the JSON body, so this is far above axum's 2 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Size of the database connection pool (default: `20`).
    pub db_max_connections: u32,
    /// What to do when a single child item insert fails.
    pub child_write_policy: ChildWritePolicy,
    /// Shared password and session cookie settings.
    pub auth: AuthConfig,
}

/// Access gate configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The shared site password. `None` is a deployment error that is
    /// reported on every login attempt rather than at startup.
    pub app_password: Option<String>,
    /// Key for signing session markers. Falls back to `app_password`.
    pub session_secret: Option<String>,
    /// Emit the `Secure` cookie attribute.
    pub secure_cookie: bool,
}

impl AuthConfig {
    /// Load access gate configuration from environment variables.
    ///
    /// | Env Var          | Default |
    /// |------------------|---------|
    /// | `APP_PASSWORD`   | unset   |
    /// | `SESSION_SECRET` | unset   |
    /// | `COOKIE_SECURE`  | `false` |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());

        let secure_cookie = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            app_password: non_empty("APP_PASSWORD"),
            session_secret: non_empty("SESSION_SECRET"),
            secure_cookie,
        }
    }

    /// The key session markers are signed and verified with.
    pub fn signing_key(&self) -> Option<&str> {
        self.session_secret
            .as_deref()
            .or(self.app_password.as_deref())
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_BODY_BYTES`       | `26214400` (25 MiB)        |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `CHILD_WRITE_POLICY`   | `best_effort`              |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .map(|v| v.parse().expect("MAX_BODY_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let child_write_policy: ChildWritePolicy = std::env::var("CHILD_WRITE_POLICY")
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|e| panic!("CHILD_WRITE_POLICY is invalid: {e}"))
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            db_max_connections,
            child_write_policy,
            auth: AuthConfig::from_env(),
        }
    }
}
