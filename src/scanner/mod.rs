//! Music library scanner.
//!
//! Walks a directory tree for audio files and reads their embedded tags.
//! Unreadable subdirectories are skipped rather than failing the whole walk.

pub mod metadata;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub use metadata::read_metadata;

/// Supported audio file extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "aac", "ogg", "wma", "m4a"];

/// Content type used when an extension is not in the table.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Lowercased extension of a path, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Whether the path has one of the supported audio extensions (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    match extension_of(path) {
        Some(ext) => AUDIO_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// MIME type to serve a file with, based on its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("aac") => "audio/aac",
        Some("m4a") => "audio/mp4",
        Some("wma") => "audio/x-ms-wma",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Recursively collect every audio file under `dir`.
///
/// A missing or unreadable `dir` yields an empty list. Entries that fail to
/// read are logged and skipped. The result is sorted by path.
pub fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let mut audio_files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_audio_file(path))
        .collect();

    audio_files.sort();
    audio_files
}
