//! Mapping between library-relative paths and files on disk.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Path escapes the library root: {0}")]
    EscapesRoot(String),
}

/// The library root and the conversions anchored on it.
#[derive(Debug, Clone)]
pub struct LibraryPaths {
    root: PathBuf,
}

impl LibraryPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a client supplied relative path to a path under the root.
    ///
    /// Resolution is lexical: `.` is dropped and `..` pops a component.
    /// Absolute paths and any `..` that would climb above the root are rejected.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf, PathError> {
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(rel).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(PathError::EscapesRoot(rel.to_string()));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PathError::EscapesRoot(rel.to_string()));
                }
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }

    /// Relative, `/`-separated form of a path under the root.
    ///
    /// Paths outside the root are returned unchanged.
    pub fn to_relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }
}
