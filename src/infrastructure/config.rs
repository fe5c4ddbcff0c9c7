//! Process configuration, read from the environment (and `.env` if present).

const DEFAULT_DATABASE_URL: &str = "sqlite://rst_slamet_riyadi.db";
const DEFAULT_SESSION_SECRET: &str = "dev-only-session-secret-change-me";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL, e.g. `sqlite://portal.db` or `sqlite::memory:`
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    /// HMAC key for session tokens
    pub session_secret: String,
    /// Session lifetime in seconds
    pub session_ttl_secs: i64,
    pub log_level: String,
}

impl AppConfig {
    /// Builds the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` (default: `sqlite://rst_slamet_riyadi.db`)
    /// - `DATABASE_MAX_CONNECTIONS` (default: 5)
    /// - `HOST` (default: `127.0.0.1`)
    /// - `PORT` (default: 8080)
    /// - `SESSION_SECRET` (default: a development secret)
    /// - `SESSION_TTL_SECS` (default: 3600)
    /// - `LOG_LEVEL` (default: `info`)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let session_secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string());

        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 8080),
            session_secret,
            session_ttl_secs: env_parse("SESSION_TTL_SECS", 3600),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// In-memory database and a fixed secret; used by tests.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            session_secret: "test-session-secret".to_string(),
            session_ttl_secs: 3600,
            log_level: "debug".to_string(),
        }
    }

    pub fn uses_development_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
