//! Audio file listing types.
//!
//! An [`AudioFile`] is never persisted. It is rebuilt on every listing from the
//! file on disk, its embedded tags and the annotation store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use super::annotation::AnnotationDocument;

/// Sentinel message carried by a record whose tags could not be read.
pub const METADATA_READ_ERROR: &str = "Could not read metadata";

/// Album name used to group tracks without an album tag.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// One audio file as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioFile {
    /// Path relative to the library root, always `/`-separated.
    #[serde(rename = "relPath")]
    pub rel_path: String,
    /// File name including extension.
    pub name: String,
    pub metadata: MetadataRecord,
    /// User annotation, empty when none has been written yet.
    pub document: AnnotationDocument,
}

impl AudioFile {
    /// Album used for grouping, `None` when the tags are unreadable or untagged.
    pub fn album(&self) -> Option<&str> {
        match &self.metadata {
            MetadataRecord::Tags(meta) => meta.album.as_deref(),
            MetadataRecord::Unreadable { .. } => None,
        }
    }

    /// Track number used for ordering, 0 when missing.
    pub fn track_no(&self) -> u32 {
        match &self.metadata {
            MetadataRecord::Tags(meta) => meta.track.no.unwrap_or(0),
            MetadataRecord::Unreadable { .. } => 0,
        }
    }
}

/// Result of reading a file's embedded tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataRecord {
    /// `{"error": "Could not read metadata"}`
    Unreadable { error: String },
    Tags(TrackMetadata),
}

impl MetadataRecord {
    pub fn unreadable() -> Self {
        MetadataRecord::Unreadable {
            error: METADATA_READ_ERROR.to_string(),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, MetadataRecord::Unreadable { .. })
    }
}

/// Embedded tag values. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    #[serde(default)]
    pub track: TrackNumber,
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub picture: Vec<Picture>,
}

/// Track position, `{"no": 3, "of": 12}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackNumber {
    pub no: Option<u32>,
    pub of: Option<u32>,
}

/// Embedded cover image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Picture {
    /// MIME type, e.g. `image/jpeg`.
    pub format: String,
    /// Base64 encoded image bytes.
    pub data: String,
}

impl Picture {
    pub fn from_bytes(format: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            format: format.into(),
            data: BASE64.encode(bytes),
        }
    }
}
