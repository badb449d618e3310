use std::env;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and shared through the
/// application state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects log format and whether DATABASE_URL is mandatory.
    pub env: Env,
    // Postgres connection string. `None` selects the in-memory store (local only).
    pub db_url: Option<String>,
    pub db_max_connections: u32,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Base URLs the console layer uses to reach the two stores.
    pub content_api_url: String,
    pub register_api_url: String,
}

/// Env
///
/// Runtime context: pretty logs and optional database locally, JSON logs and a
/// mandatory database in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    pub fn as_str(&self) -> &'static str {
        match self {
            Env::Local => "local",
            Env::Production => "production",
        }
    }
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for test scaffolding: local env, in-memory store.
    fn default() -> Self {
        Self {
            env: Env::Local,
            db_url: None,
            db_max_connections: 5,
            bind_addr: "127.0.0.1:0".to_string(),
            content_api_url: format!("{}/content", DEFAULT_PUBLIC_BASE_URL),
            register_api_url: format!("{}/register", DEFAULT_PUBLIC_BASE_URL),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `DATABASE_URL` is missing, or when
    /// `DB_MAX_CONNECTIONS` is set but not a number.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in production"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .map(|v| {
                v.parse::<u32>()
                    .expect("FATAL: DB_MAX_CONNECTIONS must be a positive integer")
            })
            .unwrap_or(5);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/');

        let content_api_url =
            env::var("CONTENT_API_URL").unwrap_or_else(|_| format!("{}/content", base_url));
        let register_api_url =
            env::var("REGISTER_API_URL").unwrap_or_else(|_| format!("{}/register", base_url));

        Self {
            env,
            db_url,
            db_max_connections,
            bind_addr,
            content_api_url,
            register_api_url,
        }
    }
}
