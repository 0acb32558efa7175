use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Id;
use crate::model::{AuthorSummary, Category, Tag};

string_enum! {
    PostStatus("post status") {
        Draft => "draft",
        Published => "published",
    }
}

string_enum! {
    PostType("post type") {
        Note => "note",
        Project => "project",
        Life => "life",
        Pitfall => "pitfall",
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Draft
    }
}

impl Default for PostType {
    fn default() -> Self {
        PostType::Note
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub status: PostStatus,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Id,
}

/// A post with its author and associations loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}
