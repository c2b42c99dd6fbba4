//! Library listing and annotations.
//!
//! Every listing rescans the tree and rereads every file's tags. Nothing is
//! cached, so the result always reflects what is on disk.

pub mod paths;

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::models::{AnnotationDocument, AudioFile};
use crate::scanner::{read_metadata, scan_directory};
use crate::store::{AnnotationMap, Repository, RepositoryExt, StoreError};

pub use paths::{LibraryPaths, PathError};

/// Errors that can occur in library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Missing required field: {0}")]
    Validation(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Observer notified after an annotation has been written.
pub trait AnnotationHook: Send + Sync {
    fn on_annotation_update(&self, rel_path: &str, document: &AnnotationDocument);
}

/// Logs every annotation update.
pub struct LogAnnotationHook;

impl AnnotationHook for LogAnnotationHook {
    fn on_annotation_update(&self, rel_path: &str, document: &AnnotationDocument) {
        tracing::info!(
            "Annotation updated for {} ({} fields)",
            rel_path,
            document.0.len()
        );
    }
}

/// Scanner, tag reader and annotation store composed into the file listing.
pub struct LibraryService {
    paths: LibraryPaths,
    annotations: Arc<dyn Repository<AnnotationMap>>,
    hooks: Vec<Arc<dyn AnnotationHook>>,
}

impl LibraryService {
    /// Create a service with the logging hook registered.
    pub fn new(paths: LibraryPaths, annotations: Arc<dyn Repository<AnnotationMap>>) -> Self {
        Self {
            paths,
            annotations,
            hooks: vec![Arc::new(LogAnnotationHook)],
        }
    }

    /// Register an additional annotation hook.
    pub fn with_hook(mut self, hook: Arc<dyn AnnotationHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// List every audio file under the library root, or under `dir` relative to it.
    ///
    /// Fails only when `dir` escapes the root or the annotation store cannot be
    /// read. Files with unreadable tags carry the error sentinel instead.
    pub fn list_files(&self, dir: Option<&str>) -> Result<Vec<AudioFile>, LibraryError> {
        let target = match dir {
            Some(dir) => self.paths.resolve(dir)?,
            None => self.paths.root().to_path_buf(),
        };

        let files = scan_directory(&target);
        let annotations = self.annotations.load()?;
        tracing::debug!("Listing {} audio files under {}", files.len(), target.display());

        // Tag reading is the slow part, spread it over the rayon pool
        let listing = files
            .par_iter()
            .map(|path| self.build_audio_file(path, &annotations))
            .collect();

        Ok(listing)
    }

    fn build_audio_file(&self, path: &Path, annotations: &AnnotationMap) -> AudioFile {
        let rel_path = self.paths.to_relative(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let document = annotations.get(&rel_path).cloned().unwrap_or_default();

        AudioFile {
            rel_path,
            name,
            metadata: read_metadata(path),
            document,
        }
    }

    /// Current annotation for a file, if one was ever written.
    pub fn annotation(&self, rel_path: &str) -> Result<Option<AnnotationDocument>, LibraryError> {
        Ok(self.annotations.load()?.get(rel_path).cloned())
    }

    /// Replace the annotation for `rel_path` wholesale and persist it.
    pub fn set_annotation(
        &self,
        rel_path: &str,
        document: AnnotationDocument,
    ) -> Result<(), LibraryError> {
        if rel_path.is_empty() {
            return Err(LibraryError::Validation("relPath".into()));
        }

        self.annotations
            .mutate(|map| map.insert(rel_path.to_string(), document.clone()))?;

        for hook in &self.hooks {
            hook.on_annotation_update(rel_path, &document);
        }
        Ok(())
    }
}
