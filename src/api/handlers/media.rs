//! Audio streaming handler.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::streaming::{StreamKind, open_stream};

/// Query parameters for the stream endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamParams {
    /// Path of the file relative to the library root.
    pub path: Option<String>,
}

/// GET /stream
///
/// Serves the raw file bytes. A `Range: bytes=start-end` header yields a 206
/// with `Content-Range`; a range starting past the end of the file yields 416.
pub async fn stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let rel_path = params.path.unwrap_or_default();
    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    let stream = open_stream(state.library.paths(), &rel_path, range_header).await?;
    let size = stream.size;
    let kind = stream.kind;
    let content_type = stream.content_type.to_string();
    let content_length = stream.content_length();

    let response = match kind {
        StreamKind::Unsatisfiable => (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{}", size))],
        )
            .into_response(),
        StreamKind::Partial(range) => {
            let body = Body::from_stream(ReaderStream::new(stream.into_reader()));
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_LENGTH, content_length.to_string()),
                    (header::CONTENT_RANGE, range.content_range(size)),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                body,
            )
                .into_response()
        }
        StreamKind::Full => {
            let body = Body::from_stream(ReaderStream::new(stream.into_reader()));
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_LENGTH, content_length.to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                body,
            )
                .into_response()
        }
    };
    Ok(response)
}
