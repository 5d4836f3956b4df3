//! Error responses.
//!
//! Validation failures use the `errorsMessages` envelope:
//! ```json
//! { "errorsMessages": [ { "message": "...", "field": "..." } ] }
//! ```
//! Missing resources are a bare 404 with no body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::videos::FieldError;

/// Body of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorsMessages {
    pub errors_messages: Vec<FieldError>,
}

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("video not found")]
    NotFound,

    #[error("invalid request body ({} errors)", .0.len())]
    BadRequest(Vec<FieldError>),

    #[error("request body too large")]
    PayloadTooLarge,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE.into_response(),
            ApiError::BadRequest(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorsMessages {
                    errors_messages: errors,
                }),
            )
                .into_response(),
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::BadRequest(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::BadRequest(vec![FieldError::new(rejection.body_text(), "body")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_bad_request_envelope() {
        let response =
            ApiError::BadRequest(vec![FieldError::new("title is required", "title")]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "errorsMessages": [{ "message": "title is required", "field": "title" }]
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
