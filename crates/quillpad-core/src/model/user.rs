use serde::Serialize;

use crate::Id;

string_enum! {
    /// Site-wide role; `Admin` passes every owner-or-admin check.
    Role("role") {
        Admin => "admin",
        User => "user",
    }
}

/// Public profile returned by login, registration and profile updates.
///
/// The password hash never leaves the store crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub tagline: Option<String>,
    pub role: Role,
}

/// Minimal author projection attached to posts, projects and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Id,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
