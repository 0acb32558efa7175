//! Table and index creation.
//!
//! Statements are built with sea-query and rendered for whatever backend the
//! connection reports, so the same definitions serve SQLite and Postgres.
//! Every statement is `IF NOT EXISTS`; running [`bootstrap`] twice is a no-op.

use sea_orm::sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, Table,
    TableCreateStatement,
};
use sea_orm::{ConnectionTrait, DbBackend, EntityName};
use tracing::info;

use crate::entity::{about, category, comment, post, post_category, post_tag, project, tag, user};
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub enum SchemaStatement {
    CreateTable(Box<TableCreateStatement>),
    CreateIndex(Box<IndexCreateStatement>),
}

impl SchemaStatement {
    pub fn build(&self, backend: DbBackend) -> String {
        match self {
            SchemaStatement::CreateTable(stmt) => backend.build(stmt.as_ref()).sql,
            SchemaStatement::CreateIndex(stmt) => backend.build(stmt.as_ref()).sql,
        }
    }
}

/// Creates every table and index that does not exist yet.
pub async fn bootstrap<C: ConnectionTrait>(db: &C) -> Result<(), StoreError> {
    let backend = db.get_database_backend();
    let statements = schema_statements();
    for stmt in &statements {
        db.execute_unprepared(&stmt.build(backend)).await?;
    }
    info!(?backend, statements = statements.len(), "schema ready");
    Ok(())
}

/// Statements in dependency order: referenced tables come first.
pub fn schema_statements() -> Vec<SchemaStatement> {
    let tables = [
        users(),
        terms(category::Entity.table_ref(), category::Column::Id, category::Column::Name),
        terms(tag::Entity.table_ref(), tag::Column::Id, tag::Column::Name),
        posts(),
        projects(),
        post_categories(),
        post_tags(),
        comments(),
        abouts(),
    ];
    let indexes = [
        unique_index("idx_users_email", user::Entity.table_ref(), user::Column::Email),
        unique_index("idx_users_username", user::Entity.table_ref(), user::Column::Username),
        unique_index("idx_categories_name", category::Entity.table_ref(), category::Column::Name),
        unique_index("idx_tags_name", tag::Entity.table_ref(), tag::Column::Name),
        unique_index("idx_abouts_user_id", about::Entity.table_ref(), about::Column::UserId),
        Index::create()
            .name("idx_comments_post_id")
            .table(comment::Entity.table_ref())
            .col(comment::Column::PostId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_posts_created_at")
            .table(post::Entity.table_ref())
            .col(post::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
    ];

    tables
        .into_iter()
        .map(|t| SchemaStatement::CreateTable(Box::new(t)))
        .chain(
            indexes
                .into_iter()
                .map(|i| SchemaStatement::CreateIndex(Box::new(i))),
        )
        .collect()
}

fn id_column<C: sea_orm::sea_query::IntoIden>(col: C) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn unique_index<C: sea_orm::sea_query::IntoIden>(
    name: &str,
    table: sea_orm::sea_query::TableRef,
    col: C,
) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(col)
        .unique()
        .if_not_exists()
        .to_owned()
}

fn references_user<C: sea_orm::sea_query::IntoIden>(
    name: &str,
    table: sea_orm::sea_query::TableRef,
    col: C,
) -> sea_orm::sea_query::ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(user::Entity.table_ref(), user::Column::Id)
        .on_delete(ForeignKeyAction::NoAction)
        .to_owned()
}

fn users() -> TableCreateStatement {
    Table::create()
        .table(user::Entity.table_ref())
        .if_not_exists()
        .col(id_column(user::Column::Id))
        .col(ColumnDef::new(user::Column::Email).string().not_null())
        .col(ColumnDef::new(user::Column::Username).string().not_null())
        .col(ColumnDef::new(user::Column::PasswordHash).string().not_null())
        .col(ColumnDef::new(user::Column::Role).string().not_null())
        .col(ColumnDef::new(user::Column::Avatar).text().null())
        .col(ColumnDef::new(user::Column::Tagline).string().null())
        .col(
            ColumnDef::new(user::Column::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

/// Categories and tags share a shape: an id and a unique name.
fn terms<I, N>(table: sea_orm::sea_query::TableRef, id: I, name: N) -> TableCreateStatement
where
    I: sea_orm::sea_query::IntoIden,
    N: sea_orm::sea_query::IntoIden,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(id_column(id))
        .col(ColumnDef::new(name).string_len(20).not_null())
        .to_owned()
}

fn posts() -> TableCreateStatement {
    Table::create()
        .table(post::Entity.table_ref())
        .if_not_exists()
        .col(id_column(post::Column::Id))
        .col(ColumnDef::new(post::Column::Title).string().not_null())
        .col(ColumnDef::new(post::Column::Content).text().not_null())
        .col(ColumnDef::new(post::Column::Summary).string().null())
        .col(ColumnDef::new(post::Column::Cover).text().null())
        .col(ColumnDef::new(post::Column::Status).string().not_null())
        .col(ColumnDef::new(post::Column::PostType).string().not_null())
        .col(
            ColumnDef::new(post::Column::Views)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(post::Column::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(post::Column::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(post::Column::UserId).integer().not_null())
        .foreign_key(&mut references_user(
            "fk_posts_user",
            post::Entity.table_ref(),
            post::Column::UserId,
        ))
        .to_owned()
}

fn projects() -> TableCreateStatement {
    Table::create()
        .table(project::Entity.table_ref())
        .if_not_exists()
        .col(id_column(project::Column::Id))
        .col(ColumnDef::new(project::Column::Title).string().not_null())
        .col(ColumnDef::new(project::Column::Description).text().not_null())
        .col(ColumnDef::new(project::Column::TechStack).string().null())
        .col(ColumnDef::new(project::Column::RepoUrl).string().null())
        .col(ColumnDef::new(project::Column::DemoUrl).string().null())
        .col(ColumnDef::new(project::Column::Cover).text().null())
        .col(ColumnDef::new(project::Column::ProjectType).string().not_null())
        .col(
            ColumnDef::new(project::Column::IsPinned)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(project::Column::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(project::Column::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(project::Column::UserId).integer().not_null())
        .foreign_key(&mut references_user(
            "fk_projects_user",
            project::Entity.table_ref(),
            project::Column::UserId,
        ))
        .to_owned()
}

/// Join rows block deletion of the term they point at (`NO ACTION`); the
/// coordinator turns that into a conflict.
fn post_categories() -> TableCreateStatement {
    Table::create()
        .table(post_category::Entity.table_ref())
        .if_not_exists()
        .col(ColumnDef::new(post_category::Column::PostId).integer().not_null())
        .col(ColumnDef::new(post_category::Column::CategoryId).integer().not_null())
        .primary_key(
            Index::create()
                .col(post_category::Column::PostId)
                .col(post_category::Column::CategoryId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_categories_post")
                .from(post_category::Entity.table_ref(), post_category::Column::PostId)
                .to(post::Entity.table_ref(), post::Column::Id)
                .on_delete(ForeignKeyAction::NoAction),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_categories_category")
                .from(post_category::Entity.table_ref(), post_category::Column::CategoryId)
                .to(category::Entity.table_ref(), category::Column::Id)
                .on_delete(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

fn post_tags() -> TableCreateStatement {
    Table::create()
        .table(post_tag::Entity.table_ref())
        .if_not_exists()
        .col(ColumnDef::new(post_tag::Column::PostId).integer().not_null())
        .col(ColumnDef::new(post_tag::Column::TagId).integer().not_null())
        .primary_key(
            Index::create()
                .col(post_tag::Column::PostId)
                .col(post_tag::Column::TagId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_tags_post")
                .from(post_tag::Entity.table_ref(), post_tag::Column::PostId)
                .to(post::Entity.table_ref(), post::Column::Id)
                .on_delete(ForeignKeyAction::NoAction),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_tags_tag")
                .from(post_tag::Entity.table_ref(), post_tag::Column::TagId)
                .to(tag::Entity.table_ref(), tag::Column::Id)
                .on_delete(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

fn comments() -> TableCreateStatement {
    Table::create()
        .table(comment::Entity.table_ref())
        .if_not_exists()
        .col(id_column(comment::Column::Id))
        .col(ColumnDef::new(comment::Column::Content).string_len(300).not_null())
        .col(
            ColumnDef::new(comment::Column::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(comment::Column::UserId).integer().not_null())
        .col(ColumnDef::new(comment::Column::PostId).integer().not_null())
        .foreign_key(&mut references_user(
            "fk_comments_user",
            comment::Entity.table_ref(),
            comment::Column::UserId,
        ))
        .foreign_key(
            ForeignKey::create()
                .name("fk_comments_post")
                .from(comment::Entity.table_ref(), comment::Column::PostId)
                .to(post::Entity.table_ref(), post::Column::Id)
                .on_delete(ForeignKeyAction::NoAction),
        )
        .to_owned()
}

fn abouts() -> TableCreateStatement {
    Table::create()
        .table(about::Entity.table_ref())
        .if_not_exists()
        .col(id_column(about::Column::Id))
        .col(ColumnDef::new(about::Column::UserId).integer().not_null())
        .col(ColumnDef::new(about::Column::Content).text().not_null())
        .col(
            ColumnDef::new(about::Column::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .foreign_key(&mut references_user(
            "fk_abouts_user",
            about::Entity.table_ref(),
            about::Column::UserId,
        ))
        .to_owned()
}
