//! File removal for deleted tracks.
//!
//! A plain path is not always deletable (protected storage areas); the caller
//! may then supply a [`StorageHandle`] granting access to the same file.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::FileDeleteError;

/// Opaque capability for deleting a file that its path alone cannot reach.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageHandle(String);

impl StorageHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local filesystem location behind the handle, for `file://` URIs and
    /// bare absolute paths. Other schemes need a platform-specific deleter.
    pub fn local_path(&self) -> Option<PathBuf> {
        let raw = self.0.strip_prefix("file://").unwrap_or(&self.0);
        let path = Path::new(raw);
        path.is_absolute().then(|| path.to_path_buf())
    }
}

pub trait FileDeleter {
    fn delete(&self, path: &Path, handle: Option<&StorageHandle>) -> Result<(), FileDeleteError>;
}

/// Deletes through `std::fs`, falling back to the storage handle's location.
///
/// A file that is already gone counts as deleted.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileDeleter;

impl LocalFileDeleter {
    fn remove(path: &Path) -> io::Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

impl FileDeleter for LocalFileDeleter {
    fn delete(&self, path: &Path, handle: Option<&StorageHandle>) -> Result<(), FileDeleteError> {
        let err = match Self::remove(path) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        let Some(handle) = handle else {
            return Err(FileDeleteError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        };

        tracing::debug!(
            path = %path.display(),
            handle = handle.as_str(),
            error = %err,
            "path not deletable, retrying through storage handle"
        );

        let Some(target) = handle.local_path() else {
            return Err(FileDeleteError::NoAccess {
                path: path.to_path_buf(),
            });
        };

        Self::remove(&target).map_err(|source| FileDeleteError::Io {
            path: target,
            source,
        })
    }
}
