//! API error taxonomy and its HTTP mapping.
//!
//! Every error is rendered as `{"error": "<message>"}` with the status code of
//! its category.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::library::LibraryError;
use crate::playlists::PlaylistError;
use crate::store::StoreError;
use crate::streaming::StreamError;
use crate::tagging::TagWriteError;

/// API errors that can be returned to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing or a path is not acceptable.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    /// The tag writer or the remux tool failed.
    #[error("{0}")]
    TagWrite(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TagWrite(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<LibraryError> for ApiError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::Validation(_) | LibraryError::Path(_) => {
                ApiError::Validation(e.to_string())
            }
            LibraryError::Store(e) => e.into(),
        }
    }
}

impl From<PlaylistError> for ApiError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::Validation(_) => ApiError::Validation(e.to_string()),
            PlaylistError::NotFound(_) => ApiError::NotFound(e.to_string()),
            PlaylistError::Store(e) => e.into(),
        }
    }
}

impl From<StreamError> for ApiError {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Validation(_) | StreamError::Path(_) => {
                ApiError::Validation(e.to_string())
            }
            StreamError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StreamError::Io(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TagWriteError> for ApiError {
    fn from(e: TagWriteError) -> Self {
        match e {
            TagWriteError::UnsupportedFormat(_) => ApiError::UnsupportedFormat(e.to_string()),
            _ => ApiError::TagWrite(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", e))
    }
}
