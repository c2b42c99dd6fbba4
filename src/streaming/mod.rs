//! Serving audio bytes with HTTP range support.

pub mod range;

use std::io::SeekFrom;

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};

use crate::library::{LibraryPaths, PathError};
use crate::scanner::content_type_for;

pub use range::{ByteRange, RangeError, parse_range_header};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Missing required field: {0}")]
    Validation(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What part of the file a request gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// No usable range header, the whole file.
    Full,
    Partial(ByteRange),
    /// The range starts beyond the end of the file.
    Unsatisfiable,
}

/// An opened file positioned for the requested slice.
#[derive(Debug)]
pub struct AudioStream {
    file: File,
    pub size: u64,
    pub content_type: &'static str,
    pub kind: StreamKind,
}

impl AudioStream {
    /// Number of body bytes that will be sent.
    pub fn content_length(&self) -> u64 {
        match self.kind {
            StreamKind::Full => self.size,
            StreamKind::Partial(range) => range.content_length(),
            StreamKind::Unsatisfiable => 0,
        }
    }

    /// Reader limited to exactly the bytes of the response body.
    pub fn into_reader(self) -> Take<File> {
        let len = self.content_length();
        self.file.take(len)
    }
}

/// Open `rel_path` under the library root for streaming.
///
/// A malformed range header is ignored and the whole file is served.
pub async fn open_stream(
    paths: &LibraryPaths,
    rel_path: &str,
    range_header: Option<&str>,
) -> Result<AudioStream, StreamError> {
    if rel_path.is_empty() {
        return Err(StreamError::Validation("path".into()));
    }
    let path = paths.resolve(rel_path)?;
    if !path.is_file() {
        return Err(StreamError::NotFound(rel_path.to_string()));
    }

    let mut file = File::open(&path).await?;
    let size = file.metadata().await?.len();
    let content_type = content_type_for(&path);

    let kind = match range_header.map(|value| parse_range_header(value, size)) {
        None => StreamKind::Full,
        Some(Ok(range)) => StreamKind::Partial(range),
        Some(Err(RangeError::Unsatisfiable)) => StreamKind::Unsatisfiable,
        Some(Err(RangeError::Invalid)) => {
            tracing::debug!("Ignoring malformed range header for {}", rel_path);
            StreamKind::Full
        }
    };

    if let StreamKind::Partial(range) = kind {
        file.seek(SeekFrom::Start(range.start)).await?;
    }

    Ok(AudioStream {
        file,
        size,
        content_type,
        kind,
    })
}
