use serde::{Deserialize, Serialize};

use crate::log_format::LogFormat;
use crate::pitfall::PitfallConfig;

/// Overrides `database.url`.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Overrides `auth.jwtSecret`.
pub const ENV_JWT_SECRET: &str = "QUILLPAD_JWT_SECRET";

/// Signing secret used when nothing else is configured. Fine for local
/// development only.
pub const DEFAULT_JWT_SECRET: &str = "quillpad-dev-secret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    pub fn bind(&self) -> &str {
        &self.bind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Connection string understood by SeaORM, e.g. `sqlite://quillpad.db?mode=rwc`.
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://quillpad.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime. Default: 168 (seven days).
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_hours() -> u64 {
    24 * 7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl AuthConfig {
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn token_ttl_hours(&self) -> u64 {
        self.token_ttl_hours
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Read-through cache for project listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Seconds a cached listing stays valid. `0` disables the cache.
    #[serde(default = "default_projects_ttl_secs")]
    pub projects_ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

fn default_projects_ttl_secs() -> u64 {
    60
}

fn default_max_entries() -> u64 {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            projects_ttl_secs: default_projects_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn projects_ttl_secs(&self) -> u64 {
        self.projects_ttl_secs
    }

    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    pub fn is_enabled(&self) -> bool {
        self.projects_ttl_secs > 0 && self.max_entries > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }
}

/// Top-level quillpad configuration, stored as `quillpad.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct QuillpadConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pitfall: PitfallConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl QuillpadConfig {
    /// Default file name looked up in the working directory.
    pub const FILE_NAME: &'static str = "quillpad.json";

    /// Applies environment overrides read through `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(secret) = non_empty(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
    }

    /// [`apply_env`](Self::apply_env) against the process environment.
    pub fn with_process_env(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }
}
