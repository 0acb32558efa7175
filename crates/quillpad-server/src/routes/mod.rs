//! Route table and the small helpers handlers share.

mod about;
mod accounts;
mod comments;
mod posts;
mod projects;
mod taxonomy;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post, put};
use quillpad_core::BlogError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/posts", get(posts::list).post(posts::create))
        .route("/posts/archive", get(posts::archive))
        .route("/posts/pitfalls", get(posts::pitfalls))
        .route(
            "/posts/{id}",
            get(posts::show).put(posts::update).delete(posts::remove),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::show)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/categories",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route(
            "/categories/{id}",
            put(taxonomy::rename_category).delete(taxonomy::delete_category),
        )
        .route("/tags", get(taxonomy::list_tags).post(taxonomy::create_tag))
        .route(
            "/tags/{id}",
            put(taxonomy::rename_tag).delete(taxonomy::delete_tag),
        )
        .route("/comments", get(comments::list).post(comments::create))
        .route("/comments/{id}", get(comments::show).delete(comments::remove))
        .route("/about", get(about::show).post(about::save))
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/update", put(accounts::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `{ "message": ... }` acknowledgement for deletes.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    message: String,
}

impl Message {
    pub(crate) fn deleted(what: &str) -> Self {
        Self {
            message: format!("{what} deleted successfully"),
        }
    }
}

/// Query-string number; junk reads as absent.
pub(crate) fn number<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Query-string enum filter. Empty and `all` mean no filter.
pub(crate) fn enum_filter<T: FromStr>(
    raw: Option<&str>,
    field: &str,
    allowed: &[&str],
) -> Result<Option<T>, BlogError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            BlogError::invalid(field, format!("{field} must be one of: {}", allowed.join(", ")))
        }),
    }
}
