//! User playlists and album auto-playlists.

pub mod album;

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::models::{AudioFile, Playlist, PlaylistId};
use crate::store::{PlaylistList, Repository, RepositoryExt, StoreError};

pub use album::{AlbumGroup, Reconciliation, group_by_album, reconcile};

/// Errors that can occur during playlist operations.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Missing required field: {0}")]
    Validation(String),

    #[error("Playlist not found: {0}")]
    NotFound(PlaylistId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Next identifier: the current time in milliseconds, or one past the largest
/// existing id when the clock has not moved beyond it.
pub fn next_playlist_id(existing: &[Playlist]) -> PlaylistId {
    let now = Utc::now().timestamp_millis();
    match existing.iter().map(|p| p.id).max() {
        Some(max) if max >= now => max.saturating_add(1),
        _ => now,
    }
}

/// Playlist CRUD over a playlist repository.
pub struct PlaylistService {
    store: Arc<dyn Repository<PlaylistList>>,
}

impl PlaylistService {
    pub fn new(store: Arc<dyn Repository<PlaylistList>>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Playlist>, PlaylistError> {
        Ok(self.store.load()?)
    }

    pub fn get(&self, id: PlaylistId) -> Result<Option<Playlist>, PlaylistError> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    /// Create a playlist and append it to the store.
    pub fn create(&self, name: &str, tracks: Vec<String>) -> Result<Playlist, PlaylistError> {
        if name.is_empty() {
            return Err(PlaylistError::Validation("name".into()));
        }

        let playlist = self.store.mutate(|list| {
            let playlist = Playlist::new(next_playlist_id(list), name, tracks);
            list.push(playlist.clone());
            playlist
        })?;
        tracing::debug!("Created playlist {} ({})", playlist.id, playlist.name);
        Ok(playlist)
    }

    /// Replace the whole track sequence of a playlist.
    ///
    /// An unknown id leaves the store untouched.
    pub fn replace_tracks(
        &self,
        id: PlaylistId,
        tracks: Vec<String>,
    ) -> Result<Playlist, PlaylistError> {
        let mut list = self.store.load()?;
        let playlist = list
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlaylistError::NotFound(id))?;
        playlist.tracks = tracks;
        let updated = playlist.clone();
        self.store.save(&list)?;
        Ok(updated)
    }

    /// Remove every playlist with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: PlaylistId) -> Result<bool, PlaylistError> {
        let removed = self.store.mutate(|list| {
            let before = list.len();
            list.retain(|p| p.id != id);
            before != list.len()
        })?;
        if !removed {
            tracing::debug!("Delete of unknown playlist {} ignored", id);
        }
        Ok(removed)
    }

    /// Drop duplicate playlists and create missing album playlists for `files`.
    pub fn reconcile_album_playlists(
        &self,
        files: &[AudioFile],
    ) -> Result<Reconciliation, PlaylistError> {
        let playlists = self.store.load()?;
        let result = reconcile(files, playlists, next_playlist_id);
        if !result.is_noop() {
            self.store.save(&result.playlists)?;
        }
        tracing::info!(
            "Album playlists reconciled: {} removed, {} created",
            result.removed.len(),
            result.created.len()
        );
        Ok(result)
    }
}
