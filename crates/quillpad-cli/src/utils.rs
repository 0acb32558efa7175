use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use quillpad_config::{LogConfig, QuillpadConfig};
use quillpad_store::sea_orm::DatabaseConnection;
use quillpad_store::{bootstrap, connect};
use tracing_subscriber::EnvFilter;

/// Loads `explicit`, or ./quillpad.json when present, or the defaults; then
/// applies environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<QuillpadConfig> {
    let path = match explicit {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(QuillpadConfig::FILE_NAME)).filter(|p| p.exists()),
    };

    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))?
        }
        None => QuillpadConfig::default(),
    };
    Ok(config.with_process_env())
}

/// `RUST_LOG` wins over the configured filter.
pub fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log.filter()))
        .context("parse log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if log.format().is_compact() {
        builder.compact().try_init()
    } else {
        builder.pretty().try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}

/// Connects and makes sure the schema exists.
pub async fn open_database(config: &QuillpadConfig) -> Result<DatabaseConnection> {
    let db = connect(config.database.url(), config.database.max_connections())
        .await
        .context("connect to database")?;
    bootstrap(&db).await.context("create schema")?;
    Ok(db)
}

/// Switches the working directory for the lifetime of the guard.
#[cfg(test)]
pub(crate) struct CwdGuard {
    original: PathBuf,
}

#[cfg(test)]
impl CwdGuard {
    pub(crate) fn new(dir: &Path) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        Self { original }
    }
}

#[cfg(test)]
impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    #[serial_test::serial]
    fn defaults_without_a_file() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let config = load_config(None).unwrap();
        assert_eq!(config.server.bind(), "127.0.0.1:3000");
    }

    #[test]
    #[serial_test::serial]
    fn reads_the_working_directory_file() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        fs::write(
            QuillpadConfig::FILE_NAME,
            r#"{ "server": { "bind": "0.0.0.0:8080" } }"#,
        )
        .unwrap();

        let config = load_config(None).unwrap();
        assert_eq!(config.server.bind(), "0.0.0.0:8080");
    }

    #[test]
    #[serial_test::serial]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = load_config(Some(&tmp.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    #[serial_test::serial]
    fn broken_file_reports_parse_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("parse "));
    }
}
