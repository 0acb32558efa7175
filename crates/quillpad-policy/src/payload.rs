//! Typed request bodies and their schemas.
//!
//! JSON keys follow the public API: posts and comments use snake_case id
//! lists (`category_ids`, `post_id`), projects use camelCase.

use quillpad_core::{Id, PostStatus, PostType, ProjectType};
use serde::Deserialize;
use validator::Validate;

use crate::validate::{FieldShape, Kind, Payload};

const POST_STATUS: Kind = Kind::OneOf(PostStatus::VALUES);
const POST_TYPE: Kind = Kind::OneOf(PostType::VALUES);
const PROJECT_TYPE: Kind = Kind::OneOf(ProjectType::VALUES);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub cover: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, rename = "type")]
    pub post_type: PostType,
    pub category_ids: Option<Vec<Id>>,
    pub tag_ids: Option<Vec<Id>>,
}

impl Payload for CreatePost {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("title", "Title", Kind::NonEmptyText),
        FieldShape::required("content", "Content", Kind::NonEmptyText),
        FieldShape::optional("summary", "Summary", Kind::Text),
        FieldShape::optional("cover", "Cover", Kind::Text),
        FieldShape::optional("status", "Status", POST_STATUS),
        FieldShape::optional("type", "Type", POST_TYPE),
        FieldShape::optional("category_ids", "Category ids", Kind::IntegerList),
        FieldShape::optional("tag_ids", "Tag ids", Kind::IntegerList),
    ];
}

/// Partial post update; `category_ids`/`tag_ids`, when present, replace the
/// existing associations wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub status: Option<PostStatus>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub category_ids: Option<Vec<Id>>,
    pub tag_ids: Option<Vec<Id>>,
}

impl UpdatePost {
    pub fn touches_associations(&self) -> bool {
        self.category_ids.is_some() || self.tag_ids.is_some()
    }
}

impl Payload for UpdatePost {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::optional("title", "Title", Kind::NonEmptyText),
        FieldShape::optional("content", "Content", Kind::NonEmptyText),
        FieldShape::optional("summary", "Summary", Kind::Text),
        FieldShape::optional("cover", "Cover", Kind::Text),
        FieldShape::optional("status", "Status", POST_STATUS),
        FieldShape::optional("type", "Type", POST_TYPE),
        FieldShape::optional("category_ids", "Category ids", Kind::IntegerList),
        FieldShape::optional("tag_ids", "Tag ids", Kind::IntegerList),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub tech_stack: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover: Option<String>,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Payload for CreateProject {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("title", "Title", Kind::NonEmptyText),
        FieldShape::required("description", "Description", Kind::NonEmptyText),
        FieldShape::optional("techStack", "Tech stack", Kind::Text),
        FieldShape::optional("repoUrl", "Repository URL", Kind::Text),
        FieldShape::optional("demoUrl", "Demo URL", Kind::Text),
        FieldShape::optional("cover", "Cover", Kind::Text),
        FieldShape::optional("projectType", "Project type", PROJECT_TYPE),
        FieldShape::optional("isPinned", "Pinned flag", Kind::Boolean),
    ];
}

/// Project type is fixed at creation; it is not part of the update schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover: Option<String>,
    pub is_pinned: Option<bool>,
}

impl Payload for UpdateProject {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::optional("title", "Title", Kind::NonEmptyText),
        FieldShape::optional("description", "Description", Kind::NonEmptyText),
        FieldShape::optional("techStack", "Tech stack", Kind::Text),
        FieldShape::optional("repoUrl", "Repository URL", Kind::Text),
        FieldShape::optional("demoUrl", "Demo URL", Kind::Text),
        FieldShape::optional("cover", "Cover", Kind::Text),
        FieldShape::optional("isPinned", "Pinned flag", Kind::Boolean),
    ];
}

/// Name of a category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct TermInput {
    #[validate(length(max = 20, message = "Name must be 20 characters or less"))]
    pub name: String,
}

impl Payload for TermInput {
    const SHAPE: &'static [FieldShape] = &[FieldShape::required("name", "Name", Kind::NonEmptyText)];
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateComment {
    pub post_id: Id,
    #[validate(length(max = 300, message = "Content must be 300 characters or less"))]
    pub content: String,
}

impl Payload for CreateComment {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("post_id", "Post ID", Kind::Integer),
        FieldShape::required("content", "Content", Kind::NonEmptyText),
    ];
}

/// About page body; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AboutInput {
    pub content: String,
}

impl Payload for AboutInput {
    const SHAPE: &'static [FieldShape] =
        &[FieldShape::required("content", "Content", Kind::Text)];
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Payload for RegisterInput {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("username", "Username", Kind::Text),
        FieldShape::required("email", "Email", Kind::Text),
        FieldShape::required("password", "Password", Kind::Text),
    ];

    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

impl Payload for LoginInput {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("email", "Email", Kind::Text),
        FieldShape::required("password", "Password", Kind::Text),
    ];

    fn normalize(&mut self) {
        self.email = self.email.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    pub avatar: Option<String>,
    pub tagline: Option<String>,
}

impl Payload for ProfileUpdate {
    const SHAPE: &'static [FieldShape] = &[
        FieldShape::required("username", "Username", Kind::Text),
        FieldShape::optional("avatar", "Avatar", Kind::Text),
        FieldShape::optional("tagline", "Tagline", Kind::Text),
    ];

    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
    }
}
