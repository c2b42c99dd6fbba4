//! Persistence for annotations and playlists.
//!
//! Each store holds one whole value (a map or a list) that is read fully and
//! rewritten fully on every change. There is no locking between load and
//! save: two concurrent writers can lose an update. This is an accepted
//! limitation for a single-user local tool.

pub mod json_file;
pub mod memory;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{AnnotationDocument, Playlist};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Annotation documents keyed by relative audio path.
pub type AnnotationMap = BTreeMap<String, AnnotationDocument>;

/// All playlists in creation order.
pub type PlaylistList = Vec<Playlist>;

/// Errors that can occur while reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store is poisoned")]
    Poisoned,
}

/// A whole-value repository.
pub trait Repository<T>: Send + Sync {
    /// Read the current value. A store that was never written yields the default.
    fn load(&self) -> Result<T, StoreError>;

    /// Replace the stored value.
    fn save(&self, value: &T) -> Result<(), StoreError>;
}

/// Load-modify-save helper available on every repository, including trait objects.
pub trait RepositoryExt<T>: Repository<T> {
    fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        let mut value = self.load()?;
        let result = f(&mut value);
        self.save(&value)?;
        Ok(result)
    }
}

impl<T, S: Repository<T> + ?Sized> RepositoryExt<T> for S {}
