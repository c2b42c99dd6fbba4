//! HTTP handlers.

pub mod files;
pub mod media;
pub mod metadata;
pub mod playlists;

pub use files::*;
pub use media::*;
pub use metadata::*;
pub use playlists::*;
