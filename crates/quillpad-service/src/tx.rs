use std::collections::BTreeSet;

use quillpad_core::{AuthUser, BlogError, Id, Principal};
use quillpad_store::StoreError;
use sea_orm::DatabaseTransaction;
use tracing::warn;

/// Commits on `Ok`, rolls back on `Err`, and hands `result` through.
pub(crate) async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, BlogError>,
) -> Result<T, BlogError> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(StoreError::from)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(err)
        }
    }
}

/// The calling user. Call after the policy check; anonymous callers were already refused there.
pub(crate) fn acting_user(principal: &Principal) -> Result<&AuthUser, BlogError> {
    principal
        .user()
        .ok_or_else(|| BlogError::Unauthorized("Unauthorized".into()))
}

/// Sorted, duplicate-free copy of an id list.
pub(crate) fn distinct_ids(ids: &[Id]) -> Vec<Id> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

pub(crate) fn db_err(err: sea_orm::DbErr) -> BlogError {
    StoreError::from(err).into()
}
