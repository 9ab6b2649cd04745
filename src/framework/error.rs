//! Error types shared by the catalog pipeline.
//!
//! Three layers, mirroring how a request fails:
//!
//! - [`StoreError`] - the record store could not serve a read or write.
//! - [`FieldError`] - a single wire value could not be decoded.
//! - [`ApiError`] - what a controller reports back to the caller.

use crate::framework::record::RecordId;
use thiserror::Error;

/// Errors raised by a [`RecordStore`](crate::framework::RecordStore).
///
/// The pipeline never retries or masks these; they travel to the caller as
/// [`ApiError::Store`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Record not found: {0}")]
    NotFound(RecordId),
    #[error("Record already exists: {0}")]
    Conflict(RecordId),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A wire value did not match the declared field type.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("expected {expected}, found {found}")]
pub struct FieldError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl FieldError {
    pub fn new(expected: &'static str, value: &serde_json::Value) -> Self {
        Self {
            expected,
            found: json_type_name(value),
        }
    }
}

/// Errors reported by the resource pipeline and its controllers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// A request parameter was rejected before the store was touched.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A write payload (delta) failed validation.
    #[error("{field}: {message}")]
    InvalidDelta { field: String, message: String },

    /// A lookup by id or natural key produced nothing.
    #[error("{resource}: {message}")]
    NotFound {
        resource: &'static str,
        message: String,
    },

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_delta(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDelta {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            message: message.into(),
        }
    }

    /// Prefix the field path of a delta error, e.g. `name` -> `options[2].name`.
    #[must_use]
    pub fn within(self, prefix: &str) -> Self {
        match self {
            Self::InvalidDelta { field, message } => Self::InvalidDelta {
                field: join_path(prefix, &field),
                message,
            },
            other => other,
        }
    }
}

fn join_path(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_owned()
    } else if suffix.starts_with('[') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}.{suffix}")
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
