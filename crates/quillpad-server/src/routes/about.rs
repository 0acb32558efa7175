use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct ShowParams {
    username: Option<String>,
}

pub(super) async fn show(
    State(state): State<AppState>,
    Query(params): Query<ShowParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.get_about(params.username.as_deref()).await?))
}

pub(super) async fn save(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.upsert_about(&principal, &body).await?))
}
