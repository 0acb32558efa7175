//! Categories and tags.
//!
//! The two vocabularies behave identically, so their operations are generated
//! from one template by [`term_operations!`].

use std::collections::HashMap;

use quillpad_core::{BlogError, Category, Counted, Id, Principal, Tag};
use quillpad_policy::{Action, Resource, TermInput, require, validate};
use quillpad_store::StoreError;
use quillpad_store::entity::{category, post_category, post_tag, tag};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value;
use tracing::info;

use crate::Blog;
use crate::tx::db_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Category,
    Tag,
}

impl TermKind {
    pub fn label(self) -> &'static str {
        match self {
            TermKind::Category => "Category",
            TermKind::Tag => "Tag",
        }
    }

    fn resource(self) -> Resource {
        match self {
            TermKind::Category => Resource::Category,
            TermKind::Tag => Resource::Tag,
        }
    }

    fn duplicate(self) -> BlogError {
        BlogError::Conflict(format!("{} already exists", self.label()))
    }

    fn in_use(self) -> BlogError {
        BlogError::Conflict(format!(
            "Cannot delete {} because it is used by one or more posts.",
            self.label().to_lowercase()
        ))
    }

    /// Maps a unique-index failure on write to the duplicate-name conflict.
    fn write_error(self, err: sea_orm::DbErr) -> BlogError {
        match StoreError::from(err) {
            StoreError::UniqueViolation(_) => self.duplicate(),
            other => other.into(),
        }
    }

    /// Maps a foreign-key failure on delete to the in-use conflict.
    fn delete_error(self, err: sea_orm::DbErr) -> BlogError {
        match StoreError::from(err) {
            StoreError::ForeignKeyViolation(_) => self.in_use(),
            other => other.into(),
        }
    }
}

macro_rules! term_operations {
    (
        $kind:expr, $entity:ident, $view:ident,
        links: $link:ident . $link_col:ident,
        list: $list:ident, create: $create:ident, rename: $rename:ident, delete: $delete:ident $(,)?
    ) => {
        impl Blog {
            /// Every term ordered by id, with the number of posts that reference it.
            pub async fn $list(&self) -> Result<Vec<Counted<$view>>, BlogError> {
                let counts: HashMap<Id, i64> = $link::Entity::find()
                    .select_only()
                    .column($link::Column::$link_col)
                    .column_as(
                        Expr::expr(Func::count(Expr::col($link::Column::PostId))),
                        "post_count",
                    )
                    .group_by($link::Column::$link_col)
                    .into_tuple::<(Id, i64)>()
                    .all(&self.db)
                    .await
                    .map_err(db_err)?
                    .into_iter()
                    .collect();

                let rows = $entity::Entity::find()
                    .order_by_asc($entity::Column::Id)
                    .all(&self.db)
                    .await
                    .map_err(db_err)?;
                Ok(rows
                    .into_iter()
                    .map(|row| Counted {
                        post_count: counts.get(&row.id).copied().unwrap_or(0).max(0) as u64,
                        item: $view::from(row),
                    })
                    .collect())
            }

            pub async fn $create(&self, principal: &Principal, raw: &Value) -> Result<$view, BlogError> {
                require(principal, Action::Create, &$kind.resource())?;
                let input: TermInput = validate(raw)?;

                let taken = $entity::Entity::find()
                    .filter($entity::Column::Name.eq(input.name.as_str()))
                    .count(&self.db)
                    .await
                    .map_err(db_err)?;
                if taken > 0 {
                    return Err($kind.duplicate());
                }

                let row = $entity::ActiveModel {
                    name: Set(input.name),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(|e| $kind.write_error(e))?;
                info!(kind = $kind.label(), id = row.id, name = %row.name, "term created");
                Ok($view::from(row))
            }

            pub async fn $rename(
                &self,
                principal: &Principal,
                id: Id,
                raw: &Value,
            ) -> Result<$view, BlogError> {
                require(principal, Action::Update, &$kind.resource())?;
                let input: TermInput = validate(raw)?;

                let existing = $entity::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| BlogError::not_found($kind.label()))?;
                let taken = $entity::Entity::find()
                    .filter($entity::Column::Name.eq(input.name.as_str()))
                    .filter($entity::Column::Id.ne(id))
                    .count(&self.db)
                    .await
                    .map_err(db_err)?;
                if taken > 0 {
                    return Err($kind.duplicate());
                }

                let mut row: $entity::ActiveModel = existing.into();
                row.name = Set(input.name);
                let row = row.update(&self.db).await.map_err(|e| $kind.write_error(e))?;
                info!(kind = $kind.label(), id, name = %row.name, "term renamed");
                Ok($view::from(row))
            }

            /// Fails with a conflict while any post still references the term.
            pub async fn $delete(&self, principal: &Principal, id: Id) -> Result<(), BlogError> {
                require(principal, Action::Delete, &$kind.resource())?;

                let removed = $entity::Entity::delete_by_id(id)
                    .exec(&self.db)
                    .await
                    .map_err(|e| $kind.delete_error(e))?;
                if removed.rows_affected == 0 {
                    return Err(BlogError::not_found($kind.label()));
                }
                info!(kind = $kind.label(), id, "term deleted");
                Ok(())
            }
        }
    };
}

term_operations!(
    TermKind::Category, category, Category,
    links: post_category.CategoryId,
    list: list_categories, create: create_category, rename: rename_category, delete: delete_category,
);

term_operations!(
    TermKind::Tag, tag, Tag,
    links: post_tag.TagId,
    list: list_tags, create: create_tag, rename: rename_tag, delete: delete_tag,
);
