//! Library and data-file locations.

use std::path::PathBuf;

pub const DEFAULT_LIBRARY_DIR: &str = "audio-library";
pub const DEFAULT_PORT: u16 = 5050;
pub const ANNOTATIONS_FILE: &str = "annotations.json";
pub const PLAYLISTS_FILE: &str = "playlists.json";

/// Where the library lives and where its side data is kept.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Root directory of the audio library.
    pub library_root: PathBuf,
    /// Directory holding the annotation and playlist files.
    pub data_dir: PathBuf,
    /// Program used to remux non-MP3 files.
    pub ffmpeg: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from(DEFAULT_LIBRARY_DIR),
            data_dir: Self::default_data_dir(),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl LibraryConfig {
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        Self {
            library_root: library_root.into(),
            ..Default::default()
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    /// `~/.local/share/tunedex`, or a relative `tunedex-data` when there is
    /// no home directory.
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".local/share/tunedex"))
            .unwrap_or_else(|| PathBuf::from("tunedex-data"))
    }

    pub fn annotations_path(&self) -> PathBuf {
        self.data_dir.join(ANNOTATIONS_FILE)
    }

    pub fn playlists_path(&self) -> PathBuf {
        self.data_dir.join(PLAYLISTS_FILE)
    }
}
