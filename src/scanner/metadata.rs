//! Embedded tag extraction.

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::picture::MimeType;
use lofty::tag::Accessor;

use crate::models::{MetadataRecord, Picture, TrackMetadata, TrackNumber};

/// Read the embedded tags of one file.
///
/// Never fails: a file lofty cannot parse yields the error sentinel record.
/// A parsable file without any tag yields an empty [`TrackMetadata`].
pub fn read_metadata(path: &Path) -> MetadataRecord {
    match read_tags(path) {
        Ok(meta) => MetadataRecord::Tags(meta),
        Err(e) => {
            tracing::debug!("Could not read metadata from {}: {}", path.display(), e);
            MetadataRecord::unreadable()
        }
    }
}

fn read_tags(path: &Path) -> Result<TrackMetadata, lofty::error::LoftyError> {
    let tagged_file = lofty::read_from_path(path)?;

    // Prefer the format's primary tag, fall back to whatever is present
    let Some(tag) = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
    else {
        return Ok(TrackMetadata::default());
    };

    let picture = tag
        .pictures()
        .iter()
        .map(|p| {
            let mime = match p.mime_type() {
                Some(MimeType::Png) => "image/png",
                Some(MimeType::Jpeg) => "image/jpeg",
                Some(MimeType::Gif) => "image/gif",
                Some(MimeType::Bmp) => "image/bmp",
                Some(MimeType::Tiff) => "image/tiff",
                _ => "image/jpeg",
            };
            Picture::from_bytes(mime, p.data())
        })
        .collect();

    Ok(TrackMetadata {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        track: TrackNumber {
            no: tag.track(),
            of: tag.track_total(),
        },
        year: tag.year(),
        picture,
    })
}
