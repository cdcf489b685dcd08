//! Filesystem observation primitives.
//!
//! [`FsObserver`] is the seam between the engine and the host filesystem:
//! the state observer only ever lists directories and asks whether a path
//! is a symlink.  [`SystemFs`] is the `std::fs` implementation.
use std::io;
use std::path::Path;

use crate::error::FilesystemError;

/// Read-only view of the filesystem used to determine enablement state.
#[cfg_attr(test, mockall::automock)]
pub trait FsObserver: Send + Sync {
    /// Return the names of every entry in `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or cannot be listed.
    fn list_directory(&self, path: &Path) -> Result<Vec<String>, FilesystemError>;

    /// Report whether `path` itself is a symbolic link (dangling or not).
    ///
    /// A path that does not exist is not a symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected at all, e.g. when a
    /// parent directory denies access.
    fn is_symlink(&self, path: &Path) -> Result<bool, FilesystemError>;
}

/// [`FsObserver`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl FsObserver for SystemFs {
    fn list_directory(&self, path: &Path) -> Result<Vec<String>, FilesystemError> {
        let entries = std::fs::read_dir(path).map_err(|e| FilesystemError::new(path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FilesystemError::new(path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn is_symlink(&self, path: &Path) -> Result<bool, FilesystemError> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => Ok(meta.file_type().is_symlink()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FilesystemError::new(path, e)),
        }
    }
}
