use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field name → first rule that field violated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation unless the field already has one; only the first rule is kept.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when no violation was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, BlogError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(BlogError::InvalidInput(self))
        }
    }
}

/// Coarse classification used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("invalid input")]
    InvalidInput(FieldErrors),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// The payload is for logs only and never reaches a client.
    #[error("internal server error")]
    Internal(String),
}

impl BlogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::InvalidInput(_) => ErrorKind::InvalidInput,
            BlogError::Unauthorized(_) => ErrorKind::Unauthorized,
            BlogError::Forbidden(_) => ErrorKind::Forbidden,
            BlogError::NotFound(_) => ErrorKind::NotFound,
            BlogError::Conflict(_) => ErrorKind::Conflict,
            BlogError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        BlogError::InvalidInput(FieldErrors::single(field, message))
    }

    /// `"<what> not found"`, e.g. `not_found("Post")`.
    pub fn not_found(what: &str) -> Self {
        BlogError::NotFound(format!("{what} not found"))
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        BlogError::Internal(detail.to_string())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            BlogError::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }
}
