//! Fixtures shared by the coordinator tests.

use chrono::Utc;
use quillpad_core::{AuthUser, Id, PostDetail, Principal, Role};
use quillpad_store::connect_in_memory;
use quillpad_store::entity::user;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};

use crate::Blog;

pub(crate) async fn blog() -> Blog {
    Blog::new(connect_in_memory().await.expect("in-memory database"))
}

/// Inserts an account directly, skipping password hashing.
pub(crate) async fn account(blog: &Blog, name: &str, role: Role) -> Principal {
    let row = user::ActiveModel {
        email: Set(format!("{name}@example.com")),
        username: Set(name.to_string()),
        password_hash: Set("unused".into()),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(blog.db())
    .await
    .expect("insert account");

    Principal::User(AuthUser {
        id: row.id,
        username: row.username,
        role,
    })
}

pub(crate) async fn member(blog: &Blog, name: &str) -> Principal {
    account(blog, name, Role::User).await
}

pub(crate) async fn admin(blog: &Blog, name: &str) -> Principal {
    account(blog, name, Role::Admin).await
}

pub(crate) fn id_of(principal: &Principal) -> Id {
    principal.id().expect("authenticated principal")
}

pub(crate) async fn post(blog: &Blog, owner: &Principal, body: Value) -> PostDetail {
    blog.create_post(owner, &body).await.expect("create post")
}

pub(crate) async fn simple_post(blog: &Blog, owner: &Principal, title: &str) -> PostDetail {
    post(blog, owner, json!({ "title": title, "content": "body" })).await
}

pub(crate) async fn category(blog: &Blog, who: &Principal, name: &str) -> Id {
    blog.create_category(who, &json!({ "name": name }))
        .await
        .expect("create category")
        .id
}

pub(crate) async fn tag(blog: &Blog, who: &Principal, name: &str) -> Id {
    blog.create_tag(who, &json!({ "name": name }))
        .await
        .expect("create tag")
        .id
}
