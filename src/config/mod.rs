use once_cell::sync::Lazy;
use std::env;

/// Process-wide immutable configuration, built once at startup from the
/// environment. Components read it through `config()`; nothing mutates it
/// after initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared secret for signing and verifying bearer tokens.
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When set, the server runs against MySQL; otherwise it falls back to
    /// the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                // Development fallback; deployments must set JWT_SECRET.
                jwt_secret: "share-a-meal-secret".to_string(),
                jwt_expiry_hours: 24,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        self
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
