use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::Message;
use crate::error::ApiError;
use crate::extract::{Body, Caller, PathId};
use crate::state::AppState;

pub(super) async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.list_categories().await?))
}

pub(super) async fn create_category(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.blog.create_category(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn rename_category(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.rename_category(&principal, id, &body).await?))
}

pub(super) async fn delete_category(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    state.blog.delete_category(&principal, id).await?;
    Ok(Json(Message::deleted("Category")))
}

pub(super) async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.list_tags().await?))
}

pub(super) async fn create_tag(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.blog.create_tag(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn rename_tag(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.rename_tag(&principal, id, &body).await?))
}

pub(super) async fn delete_tag(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    state.blog.delete_tag(&principal, id).await?;
    Ok(Json(Message::deleted("Tag")))
}
