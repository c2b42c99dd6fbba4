//! Application state shared across all handlers.

use std::sync::Arc;

use crate::config::LibraryConfig;
use crate::library::{LibraryPaths, LibraryService};
use crate::playlists::PlaylistService;
use crate::store::{AnnotationMap, JsonFileStore, PlaylistList};
use crate::tagging::TagWriterRegistry;

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibraryService>,
    pub playlists: Arc<PlaylistService>,
    pub tag_writers: Arc<TagWriterRegistry>,
}

impl AppState {
    pub fn new(
        library: LibraryService,
        playlists: PlaylistService,
        tag_writers: TagWriterRegistry,
    ) -> Self {
        Self {
            library: Arc::new(library),
            playlists: Arc::new(playlists),
            tag_writers: Arc::new(tag_writers),
        }
    }

    /// Wire the services to the JSON file stores named by `config`.
    pub fn from_config(config: &LibraryConfig) -> Self {
        let annotations: JsonFileStore<AnnotationMap> =
            JsonFileStore::new(config.annotations_path());
        let playlists: JsonFileStore<PlaylistList> = JsonFileStore::new(config.playlists_path());

        Self::new(
            LibraryService::new(
                LibraryPaths::new(&config.library_root),
                Arc::new(annotations),
            ),
            PlaylistService::new(Arc::new(playlists)),
            TagWriterRegistry::with_ffmpeg(config.ffmpeg.clone()),
        )
    }
}
