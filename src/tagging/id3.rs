//! In-place ID3v2 rewriting for MP3 files.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};

use super::{TagFields, TagWriteError, TagWriter};

/// Writes title, artist, album and track number into the ID3v2 tag.
///
/// Only fields present in the request are changed. A file without an ID3v2
/// tag gets a fresh one.
pub struct Id3TagWriter;

impl TagWriter for Id3TagWriter {
    fn name(&self) -> &'static str {
        "id3"
    }

    fn write(&self, path: &Path, fields: &TagFields) -> Result<(), TagWriteError> {
        let tagged_file = lofty::read_from_path(path)?;

        let mut tag = match tagged_file.tag(TagType::Id3v2) {
            Some(existing) => existing.clone(),
            None => Tag::new(TagType::Id3v2),
        };

        if let Some(title) = &fields.title {
            tag.set_title(title.clone());
        }
        if let Some(artist) = &fields.artist {
            tag.set_artist(artist.clone());
        }
        if let Some(album) = &fields.album {
            tag.set_album(album.clone());
        }
        if let Some(track) = &fields.track {
            // Kept as text so values like "4/12" survive
            tag.remove_key(&ItemKey::TrackNumber);
            if !track.is_empty() {
                tag.insert_text(ItemKey::TrackNumber, track.clone());
            }
        }

        tag.save_to_path(path, WriteOptions::default())?;
        Ok(())
    }
}
