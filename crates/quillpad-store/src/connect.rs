use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;

use crate::error::StoreError;
use crate::schema::bootstrap;

/// Opens a pool against `url`. Does not create tables; see [`bootstrap`].
pub async fn connect(url: &str, max_connections: u32) -> Result<DatabaseConnection, StoreError> {
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(max_connections.max(1))
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    debug!(url = %redact(url), max_connections, "connecting to database");
    Ok(Database::connect(opt).await?)
}

/// A fresh in-memory SQLite database with the schema applied.
///
/// Every connection to `sqlite::memory:` is its own database, so the pool is
/// pinned to a single connection.
pub async fn connect_in_memory() -> Result<DatabaseConnection, StoreError> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(3600))
        .sqlx_logging(false);
    let db = Database::connect(opt).await?;
    bootstrap(&db).await?;
    Ok(db)
}

fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sqlite://quillpad.db?mode=rwc", "sqlite://quillpad.db?mode=rwc")]
    #[case("postgres://blog:hunter2@db:5432/blog", "postgres://***@db:5432/blog")]
    #[case("sqlite::memory:", "sqlite::memory:")]
    fn credentials_are_redacted(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(redact(url), expected);
    }
}
