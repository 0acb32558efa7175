use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quillpad_core::{PostStatus, PostType};
use quillpad_service::PostQuery;
use serde::Deserialize;

use super::{Message, enum_filter, number};
use crate::error::ApiError;
use crate::extract::{Body, Caller, PathId};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListParams {
    page: Option<String>,
    page_size: Option<String>,
    category: Option<String>,
    keyword: Option<String>,
    #[serde(rename = "type")]
    post_type: Option<String>,
    status: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<PostQuery, ApiError> {
        Ok(PostQuery {
            page: number(self.page.as_deref()),
            page_size: number(self.page_size.as_deref()),
            category: self.category.filter(|c| !c.trim().is_empty()),
            keyword: self.keyword,
            post_type: enum_filter(self.post_type.as_deref(), "type", PostType::VALUES)?,
            status: enum_filter(self.status.as_deref(), "status", PostStatus::VALUES)?,
        })
    }
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.blog.list_posts(&query).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.blog.create_post(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Counts a view and returns the post.
pub(super) async fn show(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.view_post(id).await?))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.update_post(&principal, id, &body).await?))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    state.blog.delete_post(&principal, id).await?;
    Ok(Json(Message::deleted("Post")))
}

pub(super) async fn archive(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.archive().await?))
}

pub(super) async fn pitfalls(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.pitfalls().await?))
}
