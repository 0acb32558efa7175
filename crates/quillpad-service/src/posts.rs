use chrono::{DateTime, Utc};
use quillpad_content::{ArchiveEntry, ArchiveYear, PitfallSections, build_archive};
use quillpad_core::{BlogError, Id, Page, PostDetail, PostStatus, PostType, Principal};
use quillpad_policy::{Action, CreatePost, Resource, UpdatePost, require, validate};
use quillpad_store::entity::{category, comment, post, post_category, post_tag};
use quillpad_store::{StoreError, load};
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::Blog;
use crate::tx::{acting_user, db_err, distinct_ids, finish};

/// Filters for the public post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Exact category name.
    pub category: Option<String>,
    /// Case-insensitive substring of the title.
    pub keyword: Option<String>,
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
}

impl PostQuery {
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_PAGE_SIZE: u64 = 100;

    pub fn page(&self) -> u64 {
        Ord::max(self.page.unwrap_or(1), 1)
    }

    pub fn page_size(&self) -> u64 {
        Ord::clamp(
            self.page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE),
            1,
            Self::MAX_PAGE_SIZE,
        )
    }

    /// Rows to skip, or `None` when the page lies past anything the store can
    /// address (the driver binds offsets as `i64`).
    fn offset(&self) -> Option<u64> {
        (self.page() - 1)
            .checked_mul(self.page_size())
            .filter(|offset| i64::try_from(*offset).is_ok())
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// A published pitfall post with its extracted preview sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitfallPreview {
    pub id: Id,
    pub title: String,
    pub summary: Option<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub sections: PitfallSections,
}

const LIKE_ESCAPE: char = '!';

/// `%keyword%` with the LIKE wildcards in `keyword` matched literally.
fn contains_pattern(keyword: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn post_not_found() -> BlogError {
    BlogError::not_found("Post")
}

pub(crate) async fn find_post<C: ConnectionTrait>(db: &C, id: Id) -> Result<post::Model, BlogError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(post_not_found)
}

/// Translates a foreign-key failure on a join-row insert into a field error.
fn link_error(err: sea_orm::DbErr, field: &str, what: &str) -> BlogError {
    match StoreError::from(err) {
        StoreError::ForeignKeyViolation(_) => BlogError::invalid(field, format!("Unknown {what} id")),
        other => other.into(),
    }
}

async fn replace_categories(
    txn: &DatabaseTransaction,
    post_id: Id,
    ids: &[Id],
) -> Result<(), BlogError> {
    post_category::Entity::delete_many()
        .filter(post_category::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Ok(());
    }
    post_category::Entity::insert_many(ids.into_iter().map(|category_id| {
        post_category::ActiveModel {
            post_id: Set(post_id),
            category_id: Set(category_id),
        }
    }))
    .exec_without_returning(txn)
    .await
    .map_err(|e| link_error(e, "category_ids", "category"))?;
    Ok(())
}

async fn replace_tags(txn: &DatabaseTransaction, post_id: Id, ids: &[Id]) -> Result<(), BlogError> {
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Ok(());
    }
    post_tag::Entity::insert_many(ids.into_iter().map(|tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    }))
    .exec_without_returning(txn)
    .await
    .map_err(|e| link_error(e, "tag_ids", "tag"))?;
    Ok(())
}

async fn insert_post(
    txn: &DatabaseTransaction,
    owner: Id,
    input: CreatePost,
) -> Result<post::Model, BlogError> {
    let now = Utc::now();
    let row = post::ActiveModel {
        title: Set(input.title),
        content: Set(input.content),
        summary: Set(input.summary),
        cover: Set(input.cover),
        status: Set(input.status.as_str().to_string()),
        post_type: Set(input.post_type.as_str().to_string()),
        views: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        user_id: Set(owner),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    if let Some(ids) = &input.category_ids {
        replace_categories(txn, row.id, ids).await?;
    }
    if let Some(ids) = &input.tag_ids {
        replace_tags(txn, row.id, ids).await?;
    }
    Ok(row)
}

/// Association lists are replaced first, then the scalar fields, all inside `txn`.
async fn apply_patch(
    txn: &DatabaseTransaction,
    existing: post::Model,
    patch: UpdatePost,
) -> Result<post::Model, BlogError> {
    let post_id = existing.id;
    if let Some(ids) = &patch.category_ids {
        replace_categories(txn, post_id, ids).await?;
    }
    if let Some(ids) = &patch.tag_ids {
        replace_tags(txn, post_id, ids).await?;
    }

    let mut row: post::ActiveModel = existing.into();
    if let Some(title) = patch.title {
        row.title = Set(title);
    }
    if let Some(content) = patch.content {
        row.content = Set(content);
    }
    if let Some(summary) = patch.summary {
        row.summary = Set(Some(summary));
    }
    if let Some(cover) = patch.cover {
        row.cover = Set(Some(cover));
    }
    if let Some(status) = patch.status {
        row.status = Set(status.as_str().to_string());
    }
    if let Some(post_type) = patch.post_type {
        row.post_type = Set(post_type.as_str().to_string());
    }
    row.updated_at = Set(Utc::now());
    row.update(txn).await.map_err(db_err)
}

/// Deletes join rows and comments before the post itself. Returns the number of comments removed.
async fn remove_post(txn: &DatabaseTransaction, post_id: Id) -> Result<u64, BlogError> {
    post_category::Entity::delete_many()
        .filter(post_category::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(db_err)?;
    post_tag::Entity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(db_err)?;
    let comments = comment::Entity::delete_many()
        .filter(comment::Column::PostId.eq(post_id))
        .exec(txn)
        .await
        .map_err(db_err)?;
    post::Entity::delete_by_id(post_id)
        .exec(txn)
        .await
        .map_err(db_err)?;
    Ok(comments.rows_affected)
}

impl Blog {
    pub async fn create_post(&self, principal: &Principal, raw: &Value) -> Result<PostDetail, BlogError> {
        require(principal, Action::Create, &Resource::Post { owner_id: None })?;
        let owner = acting_user(principal)?.id;
        let input: CreatePost = validate(raw)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = insert_post(&txn, owner, input).await;
        let row = finish(txn, result).await?;

        info!(post_id = row.id, user_id = owner, "post created");
        Ok(load::post_detail(&self.db, row).await?)
    }

    pub async fn update_post(
        &self,
        principal: &Principal,
        id: Id,
        raw: &Value,
    ) -> Result<PostDetail, BlogError> {
        let existing = find_post(&self.db, id).await?;
        require(
            principal,
            Action::Update,
            &Resource::Post {
                owner_id: Some(existing.user_id),
            },
        )?;
        let patch: UpdatePost = validate(raw)?;
        let relinked = patch.touches_associations();

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = apply_patch(&txn, existing, patch).await;
        let row = finish(txn, result).await?;

        info!(post_id = id, relinked, "post updated");
        Ok(load::post_detail(&self.db, row).await?)
    }

    /// Removes the post with its comments and association rows as one unit.
    pub async fn delete_post(&self, principal: &Principal, id: Id) -> Result<(), BlogError> {
        let existing = find_post(&self.db, id).await?;
        require(
            principal,
            Action::Delete,
            &Resource::Post {
                owner_id: Some(existing.user_id),
            },
        )?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = remove_post(&txn, id).await;
        let comments = finish(txn, result).await?;

        info!(post_id = id, comments, "post deleted");
        Ok(())
    }

    /// Bumps the view counter and returns the post as stored after the bump.
    ///
    /// Every call counts; there is no per-viewer de-duplication.
    pub async fn view_post(&self, id: Id) -> Result<PostDetail, BlogError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let result = async {
            let bumped = post::Entity::update_many()
                .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
                .filter(post::Column::Id.eq(id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            if bumped.rows_affected == 0 {
                return Err(post_not_found());
            }
            let row = find_post(&txn, id).await?;
            Ok(load::post_detail(&txn, row).await?)
        }
        .await;
        finish(txn, result).await
    }

    pub async fn list_posts(&self, query: &PostQuery) -> Result<Page<PostDetail>, BlogError> {
        let page = query.page();
        let page_size = query.page_size();
        let empty = || Page {
            data: Vec::new(),
            total: 0,
            page,
            page_size,
        };

        let mut select = post::Entity::find();
        if let Some(keyword) = query.keyword() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                    .like(contains_pattern(keyword)),
            );
        }
        if let Some(name) = &query.category {
            let Some(found) = category::Entity::find()
                .filter(category::Column::Name.eq(name.as_str()))
                .one(&self.db)
                .await
                .map_err(db_err)?
            else {
                return Ok(empty());
            };
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_category::Column::PostId)
                        .from(post_category::Entity)
                        .and_where(post_category::Column::CategoryId.eq(found.id))
                        .to_owned(),
                ),
            );
        }
        if let Some(post_type) = query.post_type {
            select = select.filter(post::Column::PostType.eq(post_type.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(post::Column::Status.eq(status.as_str()));
        }

        let total = select.clone().count(&self.db).await.map_err(db_err)?;
        let Some(offset) = query.offset().filter(|offset| *offset < total) else {
            return Ok(Page { total, ..empty() });
        };
        let rows = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(page_size)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        debug!(total, returned = rows.len(), page, "posts listed");

        Ok(Page {
            data: load::post_details(&self.db, rows).await?,
            total,
            page,
            page_size,
        })
    }

    /// Published posts grouped by year and month.
    pub async fn archive(&self) -> Result<Vec<ArchiveYear>, BlogError> {
        let rows: Vec<(Id, String, DateTime<Utc>)> = post::Entity::find()
            .select_only()
            .column(post::Column::Id)
            .column(post::Column::Title)
            .column(post::Column::CreatedAt)
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(build_archive(rows.into_iter().map(|(id, title, created_at)| {
            ArchiveEntry::from_timestamp(id, title, created_at)
        })))
    }

    /// Published pitfall posts, newest first, with preview sections.
    pub async fn pitfalls(&self) -> Result<Vec<PitfallPreview>, BlogError> {
        let rows = post::Entity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .filter(post::Column::PostType.eq(PostType::Pitfall.as_str()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| PitfallPreview {
                sections: self.extractor.extract(&row.content),
                id: row.id,
                title: row.title,
                summary: row.summary,
                views: row.views,
                created_at: row.created_at,
            })
            .collect())
    }
}
