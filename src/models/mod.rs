//! Models shared by the library, playlist and API layers.

pub mod annotation;
pub mod music;
pub mod playlist;

pub use annotation::{AnnotationDocument, AnnotationValue};
pub use music::*;
pub use playlist::{Playlist, PlaylistId, album_playlist_name};
