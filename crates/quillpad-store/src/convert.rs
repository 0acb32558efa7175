//! Row → domain view conversions.

use std::str::FromStr;

use quillpad_core::{
    About, AuthUser, AuthorSummary, Category, Post, Project, Tag, UnknownVariant, UserProfile,
};

use crate::entity::{about, category, post, project, tag, user};
use crate::error::StoreError;

fn parse_column<T>(table: &'static str, id: i32, raw: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.parse()
        .map_err(|source| StoreError::Corrupt { table, id, source })
}

impl TryFrom<post::Model> for Post {
    type Error = StoreError;

    fn try_from(row: post::Model) -> Result<Self, Self::Error> {
        Ok(Post {
            status: parse_column("posts", row.id, &row.status)?,
            post_type: parse_column("posts", row.id, &row.post_type)?,
            id: row.id,
            title: row.title,
            content: row.content,
            summary: row.summary,
            cover: row.cover,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: row.user_id,
        })
    }
}

impl TryFrom<project::Model> for Project {
    type Error = StoreError;

    fn try_from(row: project::Model) -> Result<Self, Self::Error> {
        Ok(Project {
            project_type: parse_column("projects", row.id, &row.project_type)?,
            id: row.id,
            title: row.title,
            description: row.description,
            tech_stack: row.tech_stack,
            repo_url: row.repo_url,
            demo_url: row.demo_url,
            cover: row.cover,
            is_pinned: row.is_pinned,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: row.user_id,
        })
    }
}

impl TryFrom<user::Model> for UserProfile {
    type Error = StoreError;

    fn try_from(row: user::Model) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            role: parse_column("users", row.id, &row.role)?,
            id: row.id,
            username: row.username,
            email: row.email,
            avatar: row.avatar,
            tagline: row.tagline,
        })
    }
}

impl TryFrom<&user::Model> for AuthUser {
    type Error = StoreError;

    fn try_from(row: &user::Model) -> Result<Self, Self::Error> {
        Ok(AuthUser {
            id: row.id,
            username: row.username.clone(),
            role: parse_column("users", row.id, &row.role)?,
        })
    }
}

impl From<&user::Model> for AuthorSummary {
    fn from(row: &user::Model) -> Self {
        AuthorSummary {
            id: row.id,
            username: row.username.clone(),
            avatar: row.avatar.clone(),
        }
    }
}

impl From<category::Model> for Category {
    fn from(row: category::Model) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<tag::Model> for Tag {
    fn from(row: tag::Model) -> Self {
        Tag {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<about::Model> for About {
    fn from(row: about::Model) -> Self {
        About {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use quillpad_core::{PostStatus, PostType, Role};

    fn post_row(status: &str, post_type: &str) -> post::Model {
        let now = Utc::now();
        post::Model {
            id: 7,
            title: "t".into(),
            content: "c".into(),
            summary: None,
            cover: None,
            status: status.into(),
            post_type: post_type.into(),
            views: 3,
            created_at: now,
            updated_at: now,
            user_id: 1,
        }
    }

    #[test]
    fn post_enums_are_parsed() {
        let post = Post::try_from(post_row("published", "pitfall")).unwrap();
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.post_type, PostType::Pitfall);
        assert_eq!(post.views, 3);
    }

    #[test]
    fn unknown_stored_value_is_reported_as_corrupt() {
        let err = Post::try_from(post_row("archived", "note")).unwrap_err();
        match err {
            StoreError::Corrupt { table, id, source } => {
                assert_eq!(table, "posts");
                assert_eq!(id, 7);
                assert_eq!(source.value, "archived");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn user_projections() {
        let row = user::Model {
            id: 2,
            email: "a@b.c".into(),
            username: "ann".into(),
            password_hash: "hash".into(),
            role: "admin".into(),
            avatar: Some("a.png".into()),
            tagline: None,
            created_at: Utc::now(),
        };

        let auth = AuthUser::try_from(&row).unwrap();
        assert!(auth.is_admin());
        let author = AuthorSummary::from(&row);
        assert_eq!(author.avatar.as_deref(), Some("a.png"));
        let profile = UserProfile::try_from(row).unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.email, "a@b.c");
    }
}
