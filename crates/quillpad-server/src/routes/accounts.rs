use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use quillpad_core::UserProfile;
use serde::Serialize;

use crate::error::ApiError;
use crate::extract::{Body, Caller};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Session {
    token: String,
    user: UserProfile,
}

fn session(state: &AppState, user: UserProfile) -> Result<Session, ApiError> {
    let token = state.tokens.issue(user.id, &user.username)?;
    Ok(Session { token, user })
}

pub(super) async fn register(
    State(state): State<AppState>,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.blog.register(&body).await?;
    Ok((StatusCode::CREATED, Json(session(&state, user)?)))
}

pub(super) async fn login(
    State(state): State<AppState>,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.blog.login(&body).await?;
    Ok(Json(session(&state, user)?))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Caller(principal): Caller,
    Body(body): Body,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.blog.update_profile(&principal, &body).await?))
}
