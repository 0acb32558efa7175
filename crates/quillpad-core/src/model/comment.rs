use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Id;
use crate::model::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: Id,
    pub post_id: Id,
    pub user: AuthorSummary,
}
