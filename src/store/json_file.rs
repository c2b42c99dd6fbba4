//! Flat JSON file store.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Repository, StoreError};

/// Stores one value as a pretty-printed JSON document.
///
/// A missing file reads as `T::default()`. A file that fails to parse is
/// renamed to `<name>.corrupt` and also reads as the default, so the next save
/// never overwrites the unreadable content.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable file is moved aside.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }
}

impl<T> Repository<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T, StoreError> {
        if !self.path.exists() {
            return Ok(T::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                let backup = self.corrupt_path();
                tracing::warn!(
                    "Unreadable store {} ({}), moving it to {}",
                    self.path.display(),
                    e,
                    backup.display()
                );
                fs::rename(&self.path, &backup)?;
                Ok(T::default())
            }
        }
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationDocument, AnnotationValue, Playlist};
    use crate::store::{AnnotationMap, PlaylistList, RepositoryExt};

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFileStore<PlaylistList> = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.json");
        fs::write(&path, "{ not json").unwrap();
        let store: JsonFileStore<AnnotationMap> = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        let backup = dir.path().join("annotations.json.corrupt");
        assert_eq!(store.corrupt_path(), backup);
        assert_eq!(fs::read_to_string(&backup).unwrap(), "{ not json");
        assert!(!path.exists());
    }

    #[test]
    fn test_mismatched_shape_survives_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlists.json");
        let content = r#"{"not": "a list"}"#;
        fs::write(&path, content).unwrap();
        let store: JsonFileStore<PlaylistList> = JsonFileStore::new(&path);

        store
            .mutate(|list| list.push(Playlist::new(1, "New", vec![])))
            .unwrap();

        assert_eq!(store.load().unwrap().len(), 1);
        assert_eq!(
            fs::read_to_string(store.corrupt_path()).unwrap(),
            content
        );
    }

    #[test]
    fn test_save_creates_parent_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/playlists.json");
        let store: JsonFileStore<PlaylistList> = JsonFileStore::new(&path);
        store
            .mutate(|list| list.push(Playlist::new(42, "Road", vec!["a/b.mp3".into()])))
            .unwrap();

        let reopened: JsonFileStore<PlaylistList> = JsonFileStore::new(&path);
        let list = reopened.load().unwrap();
        assert_eq!(list, vec![Playlist::new(42, "Road", vec!["a/b.mp3".into()])]);
    }

    #[test]
    fn test_annotation_map_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonFileStore<AnnotationMap> =
            JsonFileStore::new(dir.path().join("annotations.json"));
        let mut doc = AnnotationDocument::new();
        doc.insert("notes", AnnotationValue::Text("live take".into()));
        store
            .mutate(|map| map.insert("A/song.flac".into(), doc.clone()))
            .unwrap();
        assert_eq!(store.load().unwrap().get("A/song.flac"), Some(&doc));
    }
}
