//! Playlist handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::response::{SuccessResponse, ok_success};
use crate::api::state::AppState;
use crate::models::{Playlist, PlaylistId};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub tracks: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePlaylistRequest {
    pub tracks: Option<Vec<String>>,
}

/// Ids arrive as path text; anything that is not an integer matches no playlist.
fn parse_id(raw: &str) -> Option<PlaylistId> {
    raw.trim().parse().ok()
}

/// GET /playlists
pub async fn get_playlists(State(state): State<AppState>) -> Result<Json<Vec<Playlist>>, ApiError> {
    Ok(Json(state.playlists.list()?))
}

/// POST /playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePlaylistRequest>,
) -> Result<Json<Playlist>, ApiError> {
    let name = request.name.unwrap_or_default();
    let playlist = state.playlists.create(&name, request.tracks)?;
    Ok(Json(playlist))
}

/// PUT /playlists/{id}
///
/// Replaces the track sequence verbatim. Duplicates and paths that no longer
/// exist are kept as given.
pub async fn update_playlist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(request): ApiJson<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>, ApiError> {
    let id = parse_id(&raw_id)
        .ok_or_else(|| ApiError::NotFound(format!("Playlist not found: {}", raw_id)))?;
    let tracks = request
        .tracks
        .ok_or_else(|| ApiError::Validation("Missing required field: tracks".into()))?;
    Ok(Json(state.playlists.replace_tracks(id, tracks)?))
}

/// DELETE /playlists/{id}
///
/// Succeeds whether or not the playlist existed.
pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if let Some(id) = parse_id(&raw_id) {
        state.playlists.delete(id)?;
    }
    Ok(ok_success())
}

/// DELETE /playlists/reconcile
///
/// `reconcile` is not a playlist id, so this is the same no-op as deleting any
/// other unknown id.
pub async fn delete_reserved_playlist() -> Json<SuccessResponse> {
    ok_success()
}

/// PUT /playlists/reconcile
pub async fn update_reserved_playlist() -> Result<Json<Playlist>, ApiError> {
    Err(ApiError::NotFound("Playlist not found: reconcile".into()))
}

/// POST /playlists/reconcile
///
/// Lists the whole library, drops duplicate playlists and creates the missing
/// album playlists. Returns the playlist list after the run.
pub async fn reconcile_playlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<Playlist>>, ApiError> {
    let library = state.library.clone();
    let playlists = state.playlists.clone();
    let result = tokio::task::spawn_blocking(move || {
        let files = library.list_files(None)?;
        Ok::<_, ApiError>(playlists.reconcile_album_playlists(&files)?)
    })
    .await??;
    Ok(Json(result.playlists))
}
