//! Transport-neutral responses.
//!
//! Controllers never touch HTTP. They hand back an [`ApiResponse`] carrying the status
//! and the JSON document; the hosting framework writes it out.

use crate::framework::ApiError;
use serde_json::{json, Value};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 200 with a JSON document.
    Ok(Value),
    /// 204, no body.
    NoContent,
    /// An error envelope: `{"errors": {"<field>": ["<message>"]}}`.
    Error { status: u16, errors: Value },
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(_) => 200,
            Self::NoContent => 204,
            Self::Error { status, .. } => *status,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Ok(body) => Some(body),
            Self::NoContent => None,
            Self::Error { errors, .. } => Some(errors),
        }
    }

    pub fn from_result(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(body) => Self::Ok(body),
            Err(err) => {
                let response = Self::from(err.clone());
                warn!(status = response.status(), error = %err, "Request rejected");
                response
            }
        }
    }
}

/// HTTP status for an error kind.
pub fn status_code(err: &ApiError) -> u16 {
    match err {
        ApiError::Validation { .. } => 400,
        ApiError::NotFound { .. } => 404,
        ApiError::InvalidDelta { .. } => 422,
        ApiError::Store(_) => 500,
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        let status = status_code(&err);
        let (field, message) = match err {
            ApiError::Validation { field, message } => (field, message),
            ApiError::InvalidDelta { field, message } if field.is_empty() => ("json".to_owned(), message),
            ApiError::InvalidDelta { field, message } => (field, message),
            ApiError::NotFound { resource, message } => (resource.to_owned(), message),
            ApiError::Store(e) => ("store".to_owned(), e.to_string()),
        };
        Self::Error {
            status,
            errors: json!({ "errors": { field: [message] } }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::StoreError;

    #[test]
    fn errors_map_to_status_and_envelope() {
        let response = ApiResponse::from(ApiError::validation("limit", "invalid limit parameter"));
        assert_eq!(response.status(), 400);
        assert_eq!(
            response.body(),
            Some(&json!({ "errors": { "limit": ["invalid limit parameter"] } }))
        );

        let response = ApiResponse::from(ApiError::invalid_delta("", "expected object, found array"));
        assert_eq!(response.status(), 422);
        assert_eq!(
            response.body(),
            Some(&json!({ "errors": { "json": ["expected object, found array"] } }))
        );
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let response = ApiResponse::from(ApiError::from(StoreError::Closed));
        assert_eq!(response.status(), 500);
        assert_eq!(response.body(), Some(&json!({ "errors": { "store": ["Store closed"] } })));
    }

    #[test]
    fn no_content_has_no_body() {
        assert_eq!(ApiResponse::NoContent.status(), 204);
        assert!(ApiResponse::NoContent.body().is_none());
    }
}
