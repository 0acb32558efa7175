use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quillpad_core::BlogError;
use serde::Deserialize;

use super::{Message, number};
use crate::error::ApiError;
use crate::extract::{Body, Caller, PathId};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListParams {
    post_id: Option<String>,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = number(params.post_id.as_deref())
        .ok_or_else(|| BlogError::invalid("post_id", "Post ID is required"))?;
    Ok(Json(state.blog.list_comments(post_id).await?))
}

pub(super) async fn show(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.get_comment(id).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.blog.create_comment(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    state.blog.delete_comment(&principal, id).await?;
    Ok(Json(Message::deleted("Comment")))
}
