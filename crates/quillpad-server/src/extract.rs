//! Request extractors that speak [`ApiError`].

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use quillpad_core::{BlogError, Id, Principal};
use serde_json::Value;
use tracing::debug;

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::state::AppState;

/// The caller behind the request.
///
/// A missing or non-bearer `Authorization` header, or a bearer value that is
/// not a JWT at all, yields an anonymous caller. A real token that fails
/// verification, or names a user that no longer exists, is rejected with 401.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
        else {
            return Ok(Caller(Principal::Anonymous));
        };

        let user_id = match state.tokens.verify(token) {
            Ok(user_id) => user_id,
            Err(err) if err.is_malformed() => {
                debug!(error = %err, "malformed bearer value treated as anonymous");
                return Ok(Caller(Principal::Anonymous));
            }
            Err(err) => {
                debug!(error = %err, "bearer token rejected");
                return Err(invalid_credential());
            }
        };
        let user = state
            .blog
            .resolve_user(user_id)
            .await?
            .ok_or_else(invalid_credential)?;
        Ok(Caller(Principal::User(user)))
    }
}

fn invalid_credential() -> ApiError {
    ApiError(BlogError::Unauthorized("Invalid token".into()))
}

/// A numeric `{id}` path segment; anything else is a 400 "Invalid ID".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub Id);

impl<S: Send + Sync> FromRequestParts<S> for PathId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::invalid_id())?;
        parse_id(&raw).map(PathId).ok_or_else(ApiError::invalid_id)
    }
}

pub fn parse_id(raw: &str) -> Option<Id> {
    raw.trim().parse().ok()
}

/// A JSON request body, left untyped for the validation layer.
#[derive(Debug, Clone)]
pub struct Body(pub Value);

impl<S: Send + Sync> FromRequest<S> for Body {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Body(value)),
            Err(rejection) => Err(body_rejection(rejection)),
        }
    }
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        _ => "Request body is not valid JSON",
    };
    ApiError(BlogError::invalid("body", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12", Some(12))]
    #[case(" 7 ", Some(7))]
    #[case("-3", Some(-3))]
    #[case("abc", None)]
    #[case("1.5", None)]
    #[case("99999999999", None)]
    fn id_parsing(#[case] raw: &str, #[case] expected: Option<Id>) {
        assert_eq!(parse_id(raw), expected);
    }
}
