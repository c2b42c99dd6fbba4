//! Album auto-playlists.
//!
//! Tracks are grouped by album tag, exact duplicate playlists are dropped, and
//! every album without a playlist named `Album: <name>` gets one. Running the
//! reconciliation again on an unchanged library changes nothing.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{AudioFile, Playlist, PlaylistId, UNKNOWN_ALBUM, album_playlist_name};

/// Tracks of one album in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumGroup {
    pub album: String,
    pub tracks: Vec<String>,
}

/// Group files by album and order each group by track number.
///
/// Files without an album tag land in [`UNKNOWN_ALBUM`]. A missing track
/// number sorts as 0. The sort is stable, so equal numbers keep listing order.
pub fn group_by_album(files: &[AudioFile]) -> Vec<AlbumGroup> {
    let mut groups: BTreeMap<String, Vec<&AudioFile>> = BTreeMap::new();
    for file in files {
        let album = match file.album() {
            Some(album) if !album.is_empty() => album,
            _ => UNKNOWN_ALBUM,
        };
        groups.entry(album.to_string()).or_default().push(file);
    }

    groups
        .into_iter()
        .map(|(album, mut files)| {
            files.sort_by_key(|f| f.track_no());
            AlbumGroup {
                album,
                tracks: files.into_iter().map(|f| f.rel_path.clone()).collect(),
            }
        })
        .collect()
}

/// Indices of playlists that duplicate an earlier one (same name, same tracks
/// in the same order). The first of each duplicate set survives.
pub fn duplicate_indices(playlists: &[Playlist]) -> Vec<usize> {
    let mut survivors: Vec<&Playlist> = Vec::new();
    let mut duplicates = Vec::new();
    for (index, playlist) in playlists.iter().enumerate() {
        if survivors.iter().any(|kept| kept.is_duplicate_of(playlist)) {
            duplicates.push(index);
        } else {
            survivors.push(playlist);
        }
    }
    duplicates
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Reconciliation {
    pub removed: Vec<PlaylistId>,
    pub created: Vec<Playlist>,
    /// The full playlist list after the run.
    pub playlists: Vec<Playlist>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.created.is_empty()
    }
}

/// Reconcile `playlists` against the album groupings of `files`.
///
/// `next_id` is called with the current list before each creation.
pub fn reconcile(
    files: &[AudioFile],
    playlists: Vec<Playlist>,
    mut next_id: impl FnMut(&[Playlist]) -> PlaylistId,
) -> Reconciliation {
    let groups = group_by_album(files);

    let duplicates: HashSet<usize> = duplicate_indices(&playlists).into_iter().collect();
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(playlists.len());
    for (index, playlist) in playlists.into_iter().enumerate() {
        if duplicates.contains(&index) {
            tracing::info!("Removing duplicate playlist {} ({})", playlist.id, playlist.name);
            removed.push(playlist.id);
        } else {
            kept.push(playlist);
        }
    }

    // Names are checked after removal so a freed name can be reused
    let mut existing: HashSet<String> = kept.iter().map(|p| p.name.clone()).collect();
    let mut created = Vec::new();
    for group in groups {
        let name = album_playlist_name(&group.album);
        if existing.contains(&name) {
            continue;
        }
        let playlist = Playlist::new(next_id(&kept), name.clone(), group.tracks);
        tracing::info!(
            "Creating playlist {} with {} tracks",
            playlist.name,
            playlist.tracks.len()
        );
        kept.push(playlist.clone());
        created.push(playlist);
        existing.insert(name);
    }

    Reconciliation {
        removed,
        created,
        playlists: kept,
    }
}
