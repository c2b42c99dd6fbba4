//! Embedded tag editing.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::response::{SuccessResponse, ok_success};
use crate::api::state::AppState;
use crate::tagging::TagFields;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMetadataRequest {
    #[serde(rename = "relPath")]
    pub rel_path: Option<String>,
    pub metadata: Option<TagFields>,
}

/// POST /metadata
///
/// MP3 tags are rewritten in place; the other supported containers are
/// remuxed through ffmpeg and swapped in atomically.
pub async fn update_metadata(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateMetadataRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let (rel_path, fields) = match (request.rel_path, request.metadata) {
        (Some(rel_path), Some(fields)) if !rel_path.is_empty() => (rel_path, fields),
        _ => return Err(ApiError::Validation("Missing relPath or metadata".into())),
    };

    let path = state
        .library
        .paths()
        .resolve(&rel_path)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let writers = state.tag_writers.clone();
    tokio::task::spawn_blocking(move || writers.update_metadata(&path, &fields)).await??;
    Ok(ok_success())
}
