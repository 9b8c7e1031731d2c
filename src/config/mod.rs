use std::env;
use url::Url;

/// What the write path does with a relationship whose `type` is not a
/// registered (or allowed) resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipPolicy {
    /// Drop the relationship and create the record anyway.
    Lenient,
    /// Reject the request with 422.
    Strict,
}

impl RelationshipPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (default: "sqlite::memory:")
    pub database_url: String,

    /// Upper bound for the connection pool (default: 10)
    pub db_max_connections: u32,

    /// Bind address (default: "127.0.0.1")
    pub host: String,

    /// Bind port (default: 3000)
    pub port: u16,

    /// Scheme and authority used when building links (default: "http://127.0.0.1:3000")
    pub public_url: String,

    /// Path prefix for every resource route (default: "/api")
    pub api_root: String,

    /// Handling of unknown relationship types on create (default: lenient)
    pub relationship_policy: RelationshipPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 10,
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: "http://127.0.0.1:3000".to_string(),
            api_root: "/api".to_string(),
            relationship_policy: RelationshipPolicy::Lenient,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        let host = env::var("HOST").unwrap_or(default.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.port);

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.db_max_connections),

            public_url: env::var("PUBLIC_URL")
                .ok()
                .and_then(|v| valid_public_url(&v))
                .unwrap_or_else(|| format!("http://{}:{}", host, port)),

            api_root: env::var("API_ROOT")
                .map(|v| normalize_root(&v))
                .unwrap_or(default.api_root),

            relationship_policy: env::var("RELATIONSHIP_POLICY")
                .ok()
                .and_then(|v| RelationshipPolicy::parse(&v))
                .unwrap_or(default.relationship_policy),

            host,
            port,
        }
    }

    /// In-memory database and default routing, used by tests
    pub fn development() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            ..Self::default()
        }
    }

    /// Base every generated link starts with, e.g. `http://127.0.0.1:3000/api`
    pub fn link_base(&self) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), self.api_root)
    }
}

/// Only absolute http(s) URLs are usable as a link prefix.
fn valid_public_url(raw: &str) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Some(raw.trim_end_matches('/').to_string())
        }
        _ => {
            tracing::warn!("Ignoring invalid PUBLIC_URL '{}'", raw);
            None
        }
    }
}

/// `"api/"` and `"/api"` both become `"/api"`; `"/"` becomes `""`.
fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
