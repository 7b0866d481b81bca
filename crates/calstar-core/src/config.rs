use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://calstar.db?mode=rwc, postgres://...)
    pub database_url: String,

    /// Maximum pooled database connections (default: 10)
    pub database_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing (default: 8)
    pub database_acquire_timeout_secs: u64,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Missing keys and unparseable numbers fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://calstar.db?mode=rwc".to_string()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            database_acquire_timeout_secs: lookup("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Whether the database URL points at a private in-memory SQLite database.
    pub fn is_in_memory_db(&self) -> bool {
        self.database_url.starts_with("sqlite:")
            && (self.database_url.contains(":memory:") || self.database_url.contains("mode=memory"))
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
