//! Rewriting embedded tags on disk.
//!
//! A [`TagWriter`] is picked per file extension from a [`TagWriterRegistry`].
//! MP3 files get their ID3v2 frames rewritten in place. Every other supported
//! container is remuxed through ffmpeg with the audio stream copied untouched.

pub mod id3;
pub mod remux;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::scanner::extension_of;

pub use id3::Id3TagWriter;
pub use remux::RemuxTagWriter;

/// Errors that can occur while writing tags.
#[derive(Debug, Error)]
pub enum TagWriteError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} did not create output file {}", .path.display())]
    MissingOutput { tool: String, path: PathBuf },

    #[error("Failed to replace {}: {source}", .path.display())]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Tag values submitted by a client. Fields left out are `None`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagFields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Track number, accepted as a JSON number or string.
    #[serde(deserialize_with = "string_or_number")]
    pub track: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::Number(number)) => Some(number.to_string()),
        None => None,
    })
}

/// A strategy for writing tags into one family of containers.
pub trait TagWriter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the tags of `path` in place.
    fn write(&self, path: &Path, fields: &TagFields) -> Result<(), TagWriteError>;
}

/// Extension to strategy lookup table.
#[derive(Clone)]
pub struct TagWriterRegistry {
    writers: HashMap<&'static str, Arc<dyn TagWriter>>,
}

impl TagWriterRegistry {
    pub fn empty() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    /// Register `writer` for each of `extensions` (lowercase, without dot).
    pub fn register(mut self, extensions: &[&'static str], writer: Arc<dyn TagWriter>) -> Self {
        for ext in extensions {
            self.writers.insert(*ext, writer.clone());
        }
        self
    }

    /// The default table: ID3 for mp3, ffmpeg remux for the other supported formats.
    pub fn with_ffmpeg(ffmpeg: impl Into<PathBuf>) -> Self {
        Self::empty()
            .register(&["mp3"], Arc::new(Id3TagWriter))
            .register(
                &["flac", "wav", "ogg", "aac", "m4a", "wma"],
                Arc::new(RemuxTagWriter::new(ffmpeg)),
            )
    }

    /// Strategy responsible for `path`.
    pub fn writer_for(&self, path: &Path) -> Result<Arc<dyn TagWriter>, TagWriteError> {
        let ext = extension_of(path).unwrap_or_default();
        self.writers
            .get(ext.as_str())
            .cloned()
            .ok_or_else(|| TagWriteError::UnsupportedFormat(format!(".{}", ext)))
    }

    /// Dispatch on extension and rewrite the file's tags.
    ///
    /// The extension is checked before the file is touched, so an unsupported
    /// format never modifies anything on disk.
    pub fn update_metadata(&self, path: &Path, fields: &TagFields) -> Result<(), TagWriteError> {
        let writer = self.writer_for(path)?;
        if !path.is_file() {
            return Err(TagWriteError::FileNotFound(path.to_path_buf()));
        }

        tracing::info!("Updating tags of {} via {}", path.display(), writer.name());
        writer.write(path, fields).inspect_err(|e| {
            tracing::error!("Tag update failed for {}: {}", path.display(), e);
        })
    }
}

impl Default for TagWriterRegistry {
    fn default() -> Self {
        Self::with_ffmpeg("ffmpeg")
    }
}
