use std::sync::Arc;

use chrono::Utc;
use quillpad_core::{BlogError, Id, Principal, ProjectDetail};
use quillpad_policy::{Action, CreateProject, Resource, UpdateProject, require, validate};
use quillpad_store::entity::project;
use quillpad_store::load;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::Value;
use tracing::{debug, info};

use crate::Blog;
use crate::cache::ProjectQuery;
use crate::tx::{acting_user, db_err};

impl Blog {
    /// Pinned projects first, then newest. Served from the project cache when enabled.
    pub async fn list_projects(&self, query: &ProjectQuery) -> Result<Arc<Vec<ProjectDetail>>, BlogError> {
        let generation = self.projects.generation();
        if let Some(hit) = self.projects.get(generation, query).await {
            debug!(?query, "project listing served from cache");
            return Ok(hit);
        }

        let mut select = project::Entity::find();
        if query.pinned_only {
            select = select.filter(project::Column::IsPinned.eq(true));
        }
        if let Some(project_type) = query.project_type {
            select = select.filter(project::Column::ProjectType.eq(project_type.as_str()));
        }
        let rows = select
            .order_by_desc(project::Column::IsPinned)
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let listing = Arc::new(load::project_details(&self.db, rows).await?);
        self.projects
            .insert(generation, query.clone(), Arc::clone(&listing))
            .await;
        Ok(listing)
    }

    pub async fn get_project(&self, id: Id) -> Result<ProjectDetail, BlogError> {
        let row = find_project(self, id).await?;
        let mut details = load::project_details(&self.db, vec![row]).await?;
        details.pop().ok_or_else(|| BlogError::not_found("Project"))
    }

    pub async fn create_project(&self, principal: &Principal, raw: &Value) -> Result<ProjectDetail, BlogError> {
        require(principal, Action::Create, &Resource::Project { owner_id: None })?;
        let owner = acting_user(principal)?.id;
        let input: CreateProject = validate(raw)?;

        let now = Utc::now();
        let row = project::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            tech_stack: Set(input.tech_stack),
            repo_url: Set(input.repo_url),
            demo_url: Set(input.demo_url),
            cover: Set(input.cover),
            project_type: Set(input.project_type.as_str().to_string()),
            is_pinned: Set(input.is_pinned),
            created_at: Set(now),
            updated_at: Set(now),
            user_id: Set(owner),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        self.projects.invalidate();

        info!(project_id = row.id, user_id = owner, "project created");
        self.get_project(row.id).await
    }

    pub async fn update_project(
        &self,
        principal: &Principal,
        id: Id,
        raw: &Value,
    ) -> Result<ProjectDetail, BlogError> {
        let existing = find_project(self, id).await?;
        require(
            principal,
            Action::Update,
            &Resource::Project {
                owner_id: Some(existing.user_id),
            },
        )?;
        let patch: UpdateProject = validate(raw)?;

        let mut row: project::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            row.title = Set(title);
        }
        if let Some(description) = patch.description {
            row.description = Set(description);
        }
        if let Some(tech_stack) = patch.tech_stack {
            row.tech_stack = Set(Some(tech_stack));
        }
        if let Some(repo_url) = patch.repo_url {
            row.repo_url = Set(Some(repo_url));
        }
        if let Some(demo_url) = patch.demo_url {
            row.demo_url = Set(Some(demo_url));
        }
        if let Some(cover) = patch.cover {
            row.cover = Set(Some(cover));
        }
        if let Some(is_pinned) = patch.is_pinned {
            row.is_pinned = Set(is_pinned);
        }
        row.updated_at = Set(Utc::now());
        row.update(&self.db).await.map_err(db_err)?;
        self.projects.invalidate();

        info!(project_id = id, "project updated");
        self.get_project(id).await
    }

    pub async fn delete_project(&self, principal: &Principal, id: Id) -> Result<(), BlogError> {
        let existing = find_project(self, id).await?;
        require(
            principal,
            Action::Delete,
            &Resource::Project {
                owner_id: Some(existing.user_id),
            },
        )?;

        project::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        self.projects.invalidate();

        info!(project_id = id, "project deleted");
        Ok(())
    }
}

async fn find_project(blog: &Blog, id: Id) -> Result<project::Model, BlogError> {
    project::Entity::find_by_id(id)
        .one(&blog.db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| BlogError::not_found("Project"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectCache;
    use crate::testing::{admin, member};
    use quillpad_config::CacheConfig;
    use quillpad_core::{ErrorKind, ProjectType};
    use serde_json::json;

    async fn cached_blog() -> Blog {
        crate::testing::blog()
            .await
            .with_project_cache(ProjectCache::new(&CacheConfig::default()))
    }

    #[tokio::test]
    async fn create_applies_defaults_and_author_has_no_avatar() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;

        let created = blog
            .create_project(&ann, &json!({ "title": "quillpad", "description": "a blog" }))
            .await
            .unwrap();

        assert_eq!(created.project.project_type, ProjectType::Web);
        assert!(!created.project.is_pinned);
        assert_eq!(created.author.username, "ann");
        assert!(created.author.avatar.is_none());
    }

    #[tokio::test]
    async fn listing_puts_pinned_first_and_filters() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        for (title, pinned, kind) in [("a", false, "cli"), ("b", true, "web"), ("c", false, "web")] {
            blog.create_project(
                &ann,
                &json!({ "title": title, "description": "d", "isPinned": pinned, "projectType": kind }),
            )
            .await
            .unwrap();
        }

        let all = blog.list_projects(&ProjectQuery::default()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|p| p.project.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);

        let pinned = blog
            .list_projects(&ProjectQuery {
                pinned_only: true,
                project_type: None,
            })
            .await
            .unwrap();
        assert_eq!(pinned.len(), 1);

        let cli = blog
            .list_projects(&ProjectQuery {
                pinned_only: false,
                project_type: Some(ProjectType::Cli),
            })
            .await
            .unwrap();
        assert_eq!(cli[0].project.title, "a");
    }

    #[tokio::test]
    async fn writes_invalidate_cached_listings() {
        let blog = cached_blog().await;
        let ann = member(&blog, "ann").await;
        let query = ProjectQuery::default();

        assert!(blog.list_projects(&query).await.unwrap().is_empty());
        let created = blog
            .create_project(&ann, &json!({ "title": "t", "description": "d" }))
            .await
            .unwrap();
        assert_eq!(blog.list_projects(&query).await.unwrap().len(), 1);

        blog.update_project(&ann, created.project.id, &json!({ "title": "renamed" }))
            .await
            .unwrap();
        assert_eq!(blog.list_projects(&query).await.unwrap()[0].project.title, "renamed");

        blog.delete_project(&ann, created.project.id).await.unwrap();
        assert!(blog.list_projects(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_ignores_project_type_and_checks_ownership() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let bob = member(&blog, "bob").await;
        let root = admin(&blog, "root").await;
        let id = blog
            .create_project(&ann, &json!({ "title": "t", "description": "d", "projectType": "game" }))
            .await
            .unwrap()
            .project
            .id;

        let err = blog
            .update_project(&bob, id, &json!({ "isPinned": true }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let updated = blog
            .update_project(&root, id, &json!({ "isPinned": true, "projectType": "cli" }))
            .await
            .unwrap();
        assert!(updated.project.is_pinned);
        assert_eq!(updated.project.project_type, ProjectType::Game);
    }

    #[tokio::test]
    async fn missing_project() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let err = blog.get_project(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");
        assert_eq!(
            blog.delete_project(&ann, 5).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn invalid_project_type_is_a_field_error() {
        let blog = crate::testing::blog().await;
        let ann = member(&blog, "ann").await;
        let err = blog
            .create_project(&ann, &json!({ "title": "t", "description": "d", "projectType": "os" }))
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains("projectType"));
    }
}
