//! Local music library manager: listing, annotations, tag editing,
//! range streaming and playlists.

pub mod api;
pub mod config;
pub mod library;
pub mod models;
pub mod playlists;
pub mod scanner;
pub mod store;
pub mod streaming;
pub mod tagging;
