use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: Id,
    pub user_id: Id,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutOwner {
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Public About page; `content` is empty when the owner has not written one yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutPage {
    pub content: String,
    pub user: AboutOwner,
}
