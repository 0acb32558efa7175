use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Id;
use crate::model::AuthorSummary;

string_enum! {
    ProjectType("project type") {
        Web => "web",
        Mobile => "mobile",
        Desktop => "desktop",
        Cli => "cli",
        Library => "library",
        Game => "game",
        Other => "other",
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::Web
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub description: String,
    /// Comma separated, e.g. `"Rust, axum, SQLite"`.
    pub tech_stack: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover: Option<String>,
    pub project_type: ProjectType,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Id,
}

impl Project {
    /// Splits `tech_stack` into trimmed, non-empty entries.
    pub fn tech_stack_entries(&self) -> Vec<&str> {
        self.tech_stack
            .as_deref()
            .map(|s| s.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub author: AuthorSummary,
}
