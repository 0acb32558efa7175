use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quillpad_core::{BlogError, ErrorKind, FieldErrors};
use serde::Serialize;
use tracing::error;

/// A [`BlogError`] on its way out as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub BlogError);

impl ApiError {
    pub fn invalid_id() -> Self {
        ApiError(BlogError::invalid("id", "Invalid ID"))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind())
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        ApiError(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            BlogError::InvalidInput(fields) => ErrorBody {
                error: fields
                    .iter()
                    .next()
                    .map(|(_, message)| message.to_string())
                    .unwrap_or_else(|| "Invalid input".to_string()),
                fields: Some(fields),
            },
            BlogError::Internal(detail) => {
                error!(%detail, "request failed");
                ErrorBody {
                    error: "Internal Server Error".to_string(),
                    fields: None,
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                fields: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
