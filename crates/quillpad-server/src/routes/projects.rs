use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quillpad_core::{ProjectDetail, ProjectType};
use quillpad_service::ProjectQuery;
use serde::{Deserialize, Serialize};

use super::{Message, enum_filter};
use crate::error::ApiError;
use crate::extract::{Body, Caller, PathId};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListParams {
    is_pinned: Option<String>,
    project_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    data: &'a [ProjectDetail],
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ProjectQuery {
        pinned_only: params.is_pinned.as_deref().map(str::trim) == Some("true"),
        project_type: enum_filter(
            params.project_type.as_deref(),
            "projectType",
            ProjectType::VALUES,
        )?,
    };
    let listing = state.blog.list_projects(&query).await?;
    Ok(Json(Listing { data: &listing }).into_response())
}

pub(super) async fn show(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.get_project(id).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.blog.create_project(&principal, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.update_project(&principal, id, &body).await?))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Caller(principal): Caller,
    PathId(id): PathId,
) -> Result<impl IntoResponse, ApiError> {
    state.blog.delete_project(&principal, id).await?;
    Ok(Json(Message::deleted("Project")))
}
