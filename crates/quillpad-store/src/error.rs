use quillpad_core::{BlogError, UnknownVariant};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Storage failures, classified so callers can react to constraint signals
/// without looking at driver error codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("row {id} in '{table}' references a missing {missing}")]
    Dangling {
        table: &'static str,
        id: i32,
        missing: &'static str,
    },
    #[error("row {id} in '{table}' holds an invalid value: {source}")]
    Corrupt {
        table: &'static str,
        id: i32,
        #[source]
        source: UnknownVariant,
    },
    #[error(transparent)]
    Database(DbErr),
}

/// SQLite reports `RESTRICT` and deferred checks under extended codes that
/// `sql_err` does not map, but the message is stable.
const SQLITE_FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                StoreError::ForeignKeyViolation(detail)
            }
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
            _ if err.to_string().contains(SQLITE_FOREIGN_KEY_FAILED) => {
                StoreError::ForeignKeyViolation(err.to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Fallback mapping. Call sites that know what a constraint means (deleting a
/// referenced category, inserting unknown ids) translate before this applies.
impl From<StoreError> for BlogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ForeignKeyViolation(_) => BlogError::Conflict("Resource is in use".into()),
            StoreError::UniqueViolation(_) => BlogError::Conflict("Resource already exists".into()),
            other => BlogError::internal(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::ErrorKind;
    use rstest::rstest;

    #[test]
    fn unclassified_db_errors_stay_database() {
        let err = StoreError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn sqlite_foreign_key_message_is_classified() {
        let err = StoreError::from(DbErr::Exec(sea_orm::RuntimeErr::Internal(
            "error returned from database: (code: 1811) FOREIGN KEY constraint failed".into(),
        )));
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[rstest]
    #[case(StoreError::ForeignKeyViolation("fk".into()), ErrorKind::Conflict)]
    #[case(StoreError::UniqueViolation("uq".into()), ErrorKind::Conflict)]
    #[case(StoreError::Database(DbErr::Custom("x".into())), ErrorKind::Internal)]
    #[case(StoreError::Dangling { table: "posts", id: 1, missing: "user" }, ErrorKind::Internal)]
    fn blog_error_fallback(#[case] err: StoreError, #[case] kind: ErrorKind) {
        assert_eq!(BlogError::from(err).kind(), kind);
    }

    #[test]
    fn internal_mapping_hides_storage_detail() {
        let err = BlogError::from(StoreError::Database(DbErr::Custom("secret table".into())));
        assert_eq!(err.to_string(), "internal server error");
    }
}
