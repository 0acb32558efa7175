use chrono::Utc;
use quillpad_core::{BlogError, Comment, Id, Principal};
use quillpad_policy::{Action, CreateComment, Resource, require, validate};
use quillpad_store::entity::comment;
use quillpad_store::load;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use tracing::info;

use crate::Blog;
use crate::posts::find_post;
use crate::tx::{acting_user, db_err};

fn comment_not_found() -> BlogError {
    BlogError::not_found("Comment")
}

impl Blog {
    /// Comments on a post, newest first.
    pub async fn list_comments(&self, post_id: Id) -> Result<Vec<Comment>, BlogError> {
        find_post(&self.db, post_id).await?;
        let rows = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(load::comments(&self.db, rows).await?)
    }

    pub async fn get_comment(&self, id: Id) -> Result<Comment, BlogError> {
        let row = find_comment(self, id).await?;
        load::comments(&self.db, vec![row])
            .await?
            .pop()
            .ok_or_else(comment_not_found)
    }

    /// The post is looked up after validation because its id travels in the body.
    pub async fn create_comment(&self, principal: &Principal, raw: &Value) -> Result<Comment, BlogError> {
        require(
            principal,
            Action::Create,
            &Resource::Comment {
                author_id: None,
                post_owner_id: None,
            },
        )?;
        let author = acting_user(principal)?.id;
        let input: CreateComment = validate(raw)?;
        find_post(&self.db, input.post_id).await?;

        let row = comment::ActiveModel {
            content: Set(input.content),
            created_at: Set(Utc::now()),
            user_id: Set(author),
            post_id: Set(input.post_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(comment_id = row.id, post_id = row.post_id, user_id = author, "comment created");
        self.get_comment(row.id).await
    }

    /// Allowed for the comment's author, the post's owner and admins.
    pub async fn delete_comment(&self, principal: &Principal, id: Id) -> Result<(), BlogError> {
        let existing = find_comment(self, id).await?;
        let post = find_post(&self.db, existing.post_id).await?;
        require(
            principal,
            Action::Delete,
            &Resource::Comment {
                author_id: Some(existing.user_id),
                post_owner_id: Some(post.user_id),
            },
        )?;

        comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        info!(comment_id = id, post_id = post.id, "comment deleted");
        Ok(())
    }
}

async fn find_comment(blog: &Blog, id: Id) -> Result<comment::Model, BlogError> {
    comment::Entity::find_by_id(id)
        .one(&blog.db)
        .await
        .map_err(db_err)?
        .ok_or_else(comment_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{admin, id_of, member, simple_post};
    use quillpad_core::ErrorKind;
    use rstest::rstest;
    use serde_json::json;

    #[tokio::test]
    async fn create_returns_comment_with_author() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let bob = member(&blog, "bob").await;
        let post_id = simple_post(&blog, &ann, "p").await.post.id;

        let created = blog
            .create_comment(&bob, &json!({ "post_id": post_id, "content": "nice" }))
            .await
            .unwrap();

        assert_eq!(created.post_id, post_id);
        assert_eq!(created.user_id, id_of(&bob));
        assert_eq!(created.user.username, "bob");
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let err = blog
            .create_comment(&ann, &json!({ "post_id": 42, "content": "hello" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Post not found");
    }

    #[rstest]
    #[case(json!({ "post_id": 1, "content": "" }), "content", "Content is required")]
    #[case(json!({ "post_id": 1, "content": "x".repeat(301) }), "content", "Content must be 300 characters or less")]
    #[case(json!({ "post_id": "1", "content": "hi" }), "post_id", "Post ID must be a number")]
    #[tokio::test]
    async fn content_rules(#[case] body: Value, #[case] field: &str, #[case] message: &str) {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        simple_post(&blog, &ann, "p").await;

        let err = blog.create_comment(&ann, &body).await.unwrap_err();
        assert_eq!(err.field_errors().unwrap().get(field), Some(message));
    }

    #[tokio::test]
    async fn exactly_300_characters_is_accepted() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let post_id = simple_post(&blog, &ann, "p").await.post.id;
        blog.create_comment(&ann, &json!({ "post_id": post_id, "content": "é".repeat(300) }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_requires_post() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let post_id = simple_post(&blog, &ann, "p").await.post.id;
        for text in ["first", "second"] {
            blog.create_comment(&ann, &json!({ "post_id": post_id, "content": text }))
                .await
                .unwrap();
        }

        let listed = blog.list_comments(post_id).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(blog.list_comments(99).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_rights() {
        let blog = crate::testing::blog().await;
        let owner = member(&blog, "owner").await;
        let author = member(&blog, "author").await;
        let stranger = member(&blog, "stranger").await;
        let root = admin(&blog, "root").await;
        let post_id = simple_post(&blog, &owner, "p").await.post.id;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let c = blog
                .create_comment(&author, &json!({ "post_id": post_id, "content": "hi" }))
                .await
                .unwrap();
            ids.push(c.id);
        }

        let err = blog.delete_comment(&stranger, ids[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = blog.delete_comment(&Principal::Anonymous, ids[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        blog.delete_comment(&author, ids[0]).await.unwrap();
        blog.delete_comment(&owner, ids[1]).await.unwrap();
        blog.delete_comment(&root, ids[2]).await.unwrap();
        assert!(blog.list_comments(post_id).await.unwrap().is_empty());
        assert_eq!(
            blog.delete_comment(&root, ids[2]).await.unwrap_err().to_string(),
            "Comment not found"
        );
    }
}
