use chrono::Utc;
use quillpad_core::{About, AboutOwner, AboutPage, BlogError, Id, Principal, Role};
use quillpad_policy::{AboutInput, Action, Resource, require, validate};
use quillpad_store::entity::{about, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde_json::Value;
use tracing::info;

use crate::Blog;
use crate::tx::{acting_user, db_err, finish};

/// Owner of the public About page when no username is given: the first
/// admin, or failing that the first account.
async fn site_owner<C: ConnectionTrait>(db: &C) -> Result<Option<user::Model>, BlogError> {
    let admin = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Admin.as_str()))
        .order_by_asc(user::Column::Id)
        .one(db)
        .await
        .map_err(db_err)?;
    if admin.is_some() {
        return Ok(admin);
    }
    user::Entity::find()
        .order_by_asc(user::Column::Id)
        .one(db)
        .await
        .map_err(db_err)
}

pub(crate) async fn write_about<C: ConnectionTrait>(
    db: &C,
    user_id: Id,
    content: String,
) -> Result<about::Model, BlogError> {
    let existing = about::Entity::find()
        .filter(about::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(db_err)?;

    let row = match existing {
        Some(row) => {
            let mut row: about::ActiveModel = row.into();
            row.content = Set(content);
            row.updated_at = Set(Utc::now());
            row.update(db).await
        }
        None => {
            about::ActiveModel {
                user_id: Set(user_id),
                content: Set(content),
                updated_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await
        }
    };
    row.map_err(db_err)
}

impl Blog {
    pub async fn get_about(&self, username: Option<&str>) -> Result<AboutPage, BlogError> {
        let owner = match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(name) => user::Entity::find()
                .filter(user::Column::Username.eq(name))
                .one(&self.db)
                .await
                .map_err(db_err)?,
            None => site_owner(&self.db).await?,
        };
        let owner = owner.ok_or_else(|| BlogError::not_found("User"))?;

        let content = about::Entity::find()
            .filter(about::Column::UserId.eq(owner.id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(|row| row.content)
            .unwrap_or_default();

        Ok(AboutPage {
            content,
            user: AboutOwner {
                username: owner.username,
                email: owner.email,
                avatar: owner.avatar,
            },
        })
    }

    /// Creates or replaces the caller's About row. Admin only.
    pub async fn upsert_about(&self, principal: &Principal, raw: &Value) -> Result<About, BlogError> {
        let user_id = principal.id();
        require(principal, Action::Update, &Resource::About { user_id })?;
        let owner = acting_user(principal)?.id;
        let input: AboutInput = validate(raw)?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = write_about(&txn, owner, input.content).await;
        let row = finish(txn, result).await?;

        info!(user_id = owner, "about page saved");
        Ok(About::from(row))
    }
}
