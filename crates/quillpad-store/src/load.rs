//! Batch loaders that attach authors and terms to fetched rows.
//!
//! Each loader issues one query per related table regardless of how many rows
//! it is given.

use std::collections::{BTreeSet, HashMap};

use quillpad_core::{
    AuthorSummary, Category, Comment, Id, Post, PostDetail, Project, ProjectDetail, Tag,
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entity::{category, comment, post, post_category, post_tag, project, tag, user};
use crate::error::StoreError;

pub async fn users_by_id<C, I>(db: &C, ids: I) -> Result<HashMap<Id, user::Model>, StoreError>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Id>,
{
    let ids: BTreeSet<Id> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

fn author(
    users: &HashMap<Id, user::Model>,
    table: &'static str,
    id: Id,
    user_id: Id,
) -> Result<AuthorSummary, StoreError> {
    users
        .get(&user_id)
        .map(AuthorSummary::from)
        .ok_or(StoreError::Dangling {
            table,
            id,
            missing: "user",
        })
}

/// Categories per post id, each list ordered by category id.
pub async fn categories_by_post<C: ConnectionTrait>(
    db: &C,
    post_ids: &[Id],
) -> Result<HashMap<Id, Vec<Category>>, StoreError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let links = post_category::Entity::find()
        .filter(post_category::Column::PostId.is_in(post_ids.iter().copied()))
        .all(db)
        .await?;
    let term_ids: BTreeSet<Id> = links.iter().map(|l| l.category_id).collect();
    if term_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let terms: HashMap<Id, category::Model> = category::Entity::find()
        .filter(category::Column::Id.is_in(term_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut grouped: HashMap<Id, Vec<Category>> = HashMap::new();
    for link in links {
        if let Some(term) = terms.get(&link.category_id) {
            grouped
                .entry(link.post_id)
                .or_default()
                .push(Category::from(term.clone()));
        }
    }
    for list in grouped.values_mut() {
        list.sort_by_key(|c| c.id);
    }
    Ok(grouped)
}

/// Tags per post id, each list ordered by tag id.
pub async fn tags_by_post<C: ConnectionTrait>(
    db: &C,
    post_ids: &[Id],
) -> Result<HashMap<Id, Vec<Tag>>, StoreError> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let links = post_tag::Entity::find()
        .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
        .all(db)
        .await?;
    let term_ids: BTreeSet<Id> = links.iter().map(|l| l.tag_id).collect();
    if term_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let terms: HashMap<Id, tag::Model> = tag::Entity::find()
        .filter(tag::Column::Id.is_in(term_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let mut grouped: HashMap<Id, Vec<Tag>> = HashMap::new();
    for link in links {
        if let Some(term) = terms.get(&link.tag_id) {
            grouped
                .entry(link.post_id)
                .or_default()
                .push(Tag::from(term.clone()));
        }
    }
    for list in grouped.values_mut() {
        list.sort_by_key(|t| t.id);
    }
    Ok(grouped)
}

/// Attaches author, categories and tags; keeps the input order.
pub async fn post_details<C: ConnectionTrait>(
    db: &C,
    rows: Vec<post::Model>,
) -> Result<Vec<PostDetail>, StoreError> {
    let post_ids: Vec<Id> = rows.iter().map(|p| p.id).collect();
    let users = users_by_id(db, rows.iter().map(|p| p.user_id)).await?;
    let mut categories = categories_by_post(db, &post_ids).await?;
    let mut tags = tags_by_post(db, &post_ids).await?;

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let author = author(&users, "posts", id, row.user_id)?;
            Ok(PostDetail {
                post: Post::try_from(row)?,
                author,
                categories: categories.remove(&id).unwrap_or_default(),
                tags: tags.remove(&id).unwrap_or_default(),
            })
        })
        .collect()
}

pub async fn post_detail<C: ConnectionTrait>(
    db: &C,
    row: post::Model,
) -> Result<PostDetail, StoreError> {
    let id = row.id;
    post_details(db, vec![row])
        .await?
        .pop()
        .ok_or(StoreError::Dangling {
            table: "posts",
            id,
            missing: "detail",
        })
}

/// Attaches the author as `{id, username}`; keeps the input order.
pub async fn project_details<C: ConnectionTrait>(
    db: &C,
    rows: Vec<project::Model>,
) -> Result<Vec<ProjectDetail>, StoreError> {
    let users = users_by_id(db, rows.iter().map(|p| p.user_id)).await?;
    rows.into_iter()
        .map(|row| {
            let mut author = author(&users, "projects", row.id, row.user_id)?;
            author.avatar = None;
            Ok(ProjectDetail {
                project: Project::try_from(row)?,
                author,
            })
        })
        .collect()
}

pub async fn comments<C: ConnectionTrait>(
    db: &C,
    rows: Vec<comment::Model>,
) -> Result<Vec<Comment>, StoreError> {
    let users = users_by_id(db, rows.iter().map(|c| c.user_id)).await?;
    rows.into_iter()
        .map(|row| {
            Ok(Comment {
                user: author(&users, "comments", row.id, row.user_id)?,
                id: row.id,
                content: row.content,
                created_at: row.created_at,
                user_id: row.user_id,
                post_id: row.post_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::connect_in_memory;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

    async fn seed_user(db: &DatabaseConnection, name: &str) -> user::Model {
        user::ActiveModel {
            email: Set(format!("{name}@example.com")),
            username: Set(name.to_string()),
            password_hash: Set("x".into()),
            role: Set("user".into()),
            avatar: Set(Some(format!("{name}.png"))),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn seed_post(db: &DatabaseConnection, owner: Id, title: &str) -> post::Model {
        let now = Utc::now();
        post::ActiveModel {
            title: Set(title.to_string()),
            content: Set("body".into()),
            status: Set("published".into()),
            post_type: Set("note".into()),
            views: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            user_id: Set(owner),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn post_details_attach_terms_in_id_order() {
        let db = connect_in_memory().await.unwrap();
        let ann = seed_user(&db, "ann").await;
        let first = seed_post(&db, ann.id, "first").await;
        let second = seed_post(&db, ann.id, "second").await;

        for name in ["rust", "db"] {
            category::ActiveModel {
                name: Set(name.into()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }
        for (post_id, category_id) in [(first.id, 2), (first.id, 1), (second.id, 2)] {
            post_category::ActiveModel {
                post_id: Set(post_id),
                category_id: Set(category_id),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let details = post_details(&db, vec![second.clone(), first.clone()])
            .await
            .unwrap();

        assert_eq!(details[0].post.id, second.id);
        assert_eq!(details[1].post.id, first.id);
        let first_terms: Vec<&str> = details[1].categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(first_terms, vec!["rust", "db"]);
        assert!(details[1].tags.is_empty());
        assert_eq!(details[0].author.username, "ann");
        assert_eq!(details[0].author.avatar.as_deref(), Some("ann.png"));
    }

    #[tokio::test]
    async fn empty_inputs_issue_no_queries() {
        let db = connect_in_memory().await.unwrap();
        assert!(post_details(&db, Vec::new()).await.unwrap().is_empty());
        assert!(users_by_id(&db, Vec::new()).await.unwrap().is_empty());
        assert!(categories_by_post(&db, &[]).await.unwrap().is_empty());
    }
}
