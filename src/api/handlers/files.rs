//! Library listing and annotation handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::response::{SuccessResponse, ok_success};
use crate::api::state::AppState;
use crate::models::{AnnotationDocument, AudioFile};

/// Query parameters for the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListFilesParams {
    /// Directory relative to the library root. Empty or absent means the root.
    pub dir: Option<String>,
}

/// GET /files
///
/// Rescans the library on every call. Unreadable files are still listed,
/// with an error metadata record.
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<ListFilesParams>,
) -> Result<Json<Vec<AudioFile>>, ApiError> {
    let library = state.library.clone();
    let files =
        tokio::task::spawn_blocking(move || library.list_files(params.dir.as_deref())).await??;
    Ok(Json(files))
}

/// Body of an annotation update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAnnotationRequest {
    #[serde(rename = "relPath")]
    pub rel_path: Option<String>,
    #[serde(alias = "jsonData")]
    pub document: Option<AnnotationDocument>,
}

/// POST /annotations
///
/// Replaces the whole annotation document of one file.
pub async fn update_annotation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateAnnotationRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let rel_path = request.rel_path.unwrap_or_default();
    let document = request.document.unwrap_or_default();
    state.library.set_annotation(&rel_path, document)?;
    Ok(ok_success())
}
