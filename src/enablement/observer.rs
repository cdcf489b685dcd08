//! Enablement state observation.
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{DirectoryPair, EnablementState};
use crate::error::FilesystemError;
use crate::fs::FsObserver;

/// Reads enablement state for a [`DirectoryPair`] through an [`FsObserver`].
#[derive(Clone)]
pub struct StateObserver {
    fs: Arc<dyn FsObserver>,
}

impl fmt::Debug for StateObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateObserver").finish_non_exhaustive()
    }
}

impl StateObserver {
    /// Create an observer over `fs`.
    #[must_use]
    pub fn new(fs: Arc<dyn FsObserver>) -> Self {
        Self { fs }
    }

    /// Snapshot the enabled flag of every entry in `pair.available_dir`.
    ///
    /// The result has exactly one key per available entry, whatever the
    /// enabled directory holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the available directory cannot be listed or an
    /// enabled-side path cannot be inspected.
    pub fn observe(&self, pair: &DirectoryPair) -> Result<EnablementState, FilesystemError> {
        let names = self.fs.list_directory(&pair.available_dir)?;
        let mut state = EnablementState::new();
        for name in names {
            let enabled = self.is_enabled(pair, &name)?;
            state.insert(name, enabled);
        }
        debug!(
            available = %pair.available_dir.display(),
            total = state.len(),
            enabled = state.values().filter(|e| **e).count(),
            "observed enablement state"
        );
        Ok(state)
    }

    /// Whether `name` has an enabling symlink.
    ///
    /// True when `enabled_dir/name` is a symlink, or when the pair's
    /// special-case rule covers `name` and its alternate link exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled-side path cannot be inspected.
    pub fn is_enabled(&self, pair: &DirectoryPair, name: &str) -> Result<bool, FilesystemError> {
        if self.fs.is_symlink(&pair.enabled_dir.join(name))? {
            return Ok(true);
        }
        match pair
            .special_case
            .as_ref()
            .and_then(|rule| rule.alternate_link(name))
        {
            Some(alternate) => self.fs.is_symlink(&pair.enabled_dir.join(alternate)),
            None => Ok(false),
        }
    }
}
