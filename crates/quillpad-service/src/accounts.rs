//! Registration, login, profile updates and the admin seed.
//!
//! Token issuance is left to the transport; these operations only establish
//! who the caller is and return the public profile.

use chrono::Utc;
use quillpad_core::{AuthUser, BlogError, Id, Principal, Role, UserProfile};
use quillpad_policy::{
    Action, LoginInput, ProfileUpdate, RegisterInput, Resource, require, validate,
};
use quillpad_store::StoreError;
use quillpad_store::entity::{about, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::Blog;
use crate::about::write_about;
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::tx::{acting_user, db_err, finish};

/// Tagline given to a freshly seeded admin account.
pub const SEED_TAGLINE: &str = "全栈开发者 / 终身学习者";

/// About page written for a freshly seeded admin account.
pub const SEED_ABOUT: &str = "# 👋 Hello\n\n\
This blog collects notes, pitfalls and projects.\n\n\
## What you'll find here\n\n\
- 📝 **Notes**: things learned along the way\n\
- 🔥 **Pitfalls**: problems hit during development and how they were solved\n\
- 💼 **Projects**: things I have built\n";

fn invalid_credentials() -> BlogError {
    BlogError::Unauthorized("Invalid credentials".into())
}

/// Unique-index failures on the users table mean someone else won the race.
fn account_write_error(err: sea_orm::DbErr, conflict: &str) -> BlogError {
    match StoreError::from(err) {
        StoreError::UniqueViolation(_) => BlogError::Conflict(conflict.to_string()),
        other => other.into(),
    }
}

fn profile(row: user::Model) -> Result<UserProfile, BlogError> {
    Ok(UserProfile::try_from(row)?)
}

async fn seed_in(
    txn: &DatabaseTransaction,
    email: &str,
    username: &str,
    password_hash: String,
) -> Result<user::Model, BlogError> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(txn)
        .await
        .map_err(db_err)?;

    let admin = match existing {
        Some(row) => {
            let mut row: user::ActiveModel = row.into();
            row.password_hash = Set(password_hash);
            row.role = Set(Role::Admin.as_str().to_string());
            row.update(txn).await.map_err(db_err)?
        }
        None => user::ActiveModel {
            email: Set(email.to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(Role::Admin.as_str().to_string()),
            tagline: Set(Some(SEED_TAGLINE.to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| account_write_error(e, "User already exists"))?,
    };

    let has_about = about::Entity::find()
        .filter(about::Column::UserId.eq(admin.id))
        .count(txn)
        .await
        .map_err(db_err)?
        > 0;
    if !has_about {
        write_about(txn, admin.id, SEED_ABOUT.to_string()).await?;
    }
    Ok(admin)
}

impl Blog {
    /// Creates a `user`-role account.
    pub async fn register(&self, raw: &Value) -> Result<UserProfile, BlogError> {
        let input: RegisterInput = validate(raw)?;

        let taken = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(input.email.as_str()))
                    .add(user::Column::Username.eq(input.username.as_str())),
            )
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if taken > 0 {
            return Err(BlogError::Conflict("User already exists".into()));
        }

        let row = user::ActiveModel {
            email: Set(input.email),
            username: Set(input.username),
            password_hash: Set(hash_password_blocking(&input.password).await?),
            role: Set(Role::User.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| account_write_error(e, "User already exists"))?;

        info!(user_id = row.id, username = %row.username, "account registered");
        profile(row)
    }

    /// Unknown email and wrong password are reported identically.
    pub async fn login(&self, raw: &Value) -> Result<UserProfile, BlogError> {
        let input: LoginInput = validate(raw)?;

        let row = user::Entity::find()
            .filter(user::Column::Email.eq(input.email.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(invalid_credentials)?;
        if !verify_password_blocking(&input.password, &row.password_hash).await? {
            warn!(user_id = row.id, "login rejected");
            return Err(invalid_credentials());
        }

        info!(user_id = row.id, "login");
        profile(row)
    }

    pub async fn update_profile(&self, principal: &Principal, raw: &Value) -> Result<UserProfile, BlogError> {
        let me = acting_user(principal)?.id;
        require(principal, Action::Update, &Resource::Profile { user_id: me })?;
        let input: ProfileUpdate = validate(raw)?;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(input.username.as_str()))
            .filter(user::Column::Id.ne(me))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if taken > 0 {
            return Err(BlogError::Conflict("Username already taken".into()));
        }

        let existing = user::Entity::find_by_id(me)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| BlogError::not_found("User"))?;
        let mut row: user::ActiveModel = existing.into();
        row.username = Set(input.username);
        if let Some(avatar) = input.avatar {
            row.avatar = Set(Some(avatar));
        }
        if let Some(tagline) = input.tagline {
            row.tagline = Set(Some(tagline));
        }
        let row = row
            .update(&self.db)
            .await
            .map_err(|e| account_write_error(e, "Username already taken"))?;

        info!(user_id = me, "profile updated");
        profile(row)
    }

    /// Loads the account behind a credential so the role is always current.
    pub async fn resolve_user(&self, id: Id) -> Result<Option<AuthUser>, BlogError> {
        let row = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        row.as_ref()
            .map(AuthUser::try_from)
            .transpose()
            .map_err(BlogError::from)
    }

    /// Creates the admin account, or resets its password and role if the
    /// email already exists, then writes a starter About page if it has none.
    pub async fn seed_admin(&self, email: &str, username: &str, password: &str) -> Result<UserProfile, BlogError> {
        let password_hash = hash_password_blocking(password).await?;

        let txn = self.db.begin().await.map_err(db_err)?;
        let result = seed_in(&txn, email, username, password_hash).await;
        let admin = finish(txn, result).await?;

        info!(user_id = admin.id, email, "admin seeded");
        profile(admin)
    }
}
