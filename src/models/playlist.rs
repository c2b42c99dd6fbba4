//! Playlist records.

use serde::{Deserialize, Serialize};

/// Playlist identifier: a millisecond creation timestamp.
pub type PlaylistId = i64;

/// Prefix of playlists generated from album groupings.
pub const ALBUM_PLAYLIST_PREFIX: &str = "Album: ";

/// A named, ordered list of track references.
///
/// Tracks are relative audio paths. Duplicates and references to files that no
/// longer exist are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<String>,
}

impl Playlist {
    pub fn new(id: PlaylistId, name: impl Into<String>, tracks: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tracks,
        }
    }

    /// Same name and the same tracks in the same order.
    pub fn is_duplicate_of(&self, other: &Playlist) -> bool {
        self.name == other.name && self.tracks == other.tracks
    }
}

/// Name of the auto playlist for an album.
pub fn album_playlist_name(album: &str) -> String {
    format!("{}{}", ALBUM_PLAYLIST_PREFIX, album)
}
