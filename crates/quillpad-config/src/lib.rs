pub mod config;
pub mod log_format;
pub mod pitfall;

pub use config::{
    AuthConfig, CacheConfig, DEFAULT_JWT_SECRET, DatabaseConfig, ENV_DATABASE_URL,
    ENV_JWT_SECRET, LogConfig, QuillpadConfig, ServerConfig,
};
pub use log_format::LogFormat;
pub use pitfall::{PitfallConfig, SectionKeywords, SectionName};
