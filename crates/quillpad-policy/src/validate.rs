//! Payload shape checks that run before any store access.
//!
//! Validation happens in two passes. The shape pass walks the raw JSON object
//! against a payload's [`FieldShape`] table (presence, JSON type, enum
//! membership, empty strings), so type errors are reported per field instead
//! of as one opaque deserialization failure. The rule pass then runs the
//! payload's `validator` rules (length bounds, email syntax) on the typed
//! value.

use quillpad_core::{BlogError, FieldErrors};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// Key used when the request body as a whole is unusable.
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    /// A string that must not be empty.
    NonEmptyText,
    Integer,
    Boolean,
    IntegerList,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldShape {
    /// JSON key.
    pub name: &'static str,
    /// Human label used in messages.
    pub label: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl FieldShape {
    pub const fn required(name: &'static str, label: &'static str, kind: Kind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: Kind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    fn check(&self, value: Option<&Value>) -> Option<String> {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                return Some(format!("{} is required", self.label));
            }
            None | Some(Value::Null) => return None,
            Some(v) => v,
        };

        match self.kind {
            Kind::Text | Kind::NonEmptyText if !value.is_string() => {
                Some(format!("{} must be a string", self.label))
            }
            Kind::NonEmptyText if value.as_str().is_some_and(str::is_empty) => {
                Some(format!("{} is required", self.label))
            }
            Kind::Integer if !is_integer(value) => {
                Some(format!("{} must be a number", self.label))
            }
            Kind::Boolean if !value.is_boolean() => {
                Some(format!("{} must be a boolean", self.label))
            }
            Kind::IntegerList => match value.as_array() {
                Some(items) if items.iter().all(is_integer) => None,
                _ => Some(format!("{} must be a list of ids", self.label)),
            },
            Kind::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => None,
                _ => Some(format!(
                    "{} must be one of: {}",
                    self.label,
                    allowed.join(", ")
                )),
            },
            _ => None,
        }
    }
}

fn is_integer(value: &Value) -> bool {
    value
        .as_i64()
        .is_some_and(|n| i32::try_from(n).is_ok())
}

/// A request body with a fixed schema.
pub trait Payload: DeserializeOwned + Validate {
    const SHAPE: &'static [FieldShape];

    /// Adjusts the typed value before the rule pass (e.g. trimming).
    fn normalize(&mut self) {}
}

/// Checks `raw` against `T`'s schema and returns the typed payload, or every
/// violated field with its first failing rule.
pub fn validate<T: Payload>(raw: &Value) -> Result<T, BlogError> {
    let Some(object) = raw.as_object() else {
        return Err(BlogError::invalid(
            BODY_FIELD,
            "Request body must be a JSON object",
        ));
    };

    let mut errors = FieldErrors::new();
    for shape in T::SHAPE {
        if let Some(message) = shape.check(object.get(shape.name)) {
            errors.add(shape.name, message);
        }
    }
    if !errors.is_empty() {
        return Err(BlogError::InvalidInput(errors));
    }

    // Explicit nulls mean "not provided" so field defaults apply.
    let present: serde_json::Map<String, Value> = object
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut payload: T = serde_json::from_value(Value::Object(present))
        .map_err(|e| BlogError::invalid(BODY_FIELD, e.to_string()))?;
    payload.normalize();

    payload
        .validate()
        .map_err(|e| BlogError::InvalidInput(rule_errors(&e)))?;
    Ok(payload)
}

fn rule_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, violations) in errors.field_errors() {
        if let Some(first) = violations.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid ({})", first.code));
            out.add(field.to_string(), message);
        }
    }
    out
}
