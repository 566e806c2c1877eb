//! Terminal request failures, handed to the generic error path.
//!
//! Validation failures and blocked deletes are NOT errors — those re-render
//! their form with a success status and never come through here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::DomainError;

#[derive(Debug)]
pub enum PageError {
    /// A required primary lookup came back absent.
    NotFound(&'static str),
    /// Store or renderer failure; surfaced unmodified, never retried.
    Internal(DomainError),
}

impl From<DomainError> for PageError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => PageError::NotFound("Resource not found"),
            other => PageError::Internal(other),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": message })),
            )
                .into_response(),
            PageError::Internal(e) => {
                tracing::error!("request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
