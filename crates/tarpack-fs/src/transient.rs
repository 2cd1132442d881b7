use std::path::{Path, PathBuf};

use crate::Result;
use crate::primitives::remove_tree;

/// A directory tree that is deleted when the guard goes away.
///
/// Removal happens in [`TransientDir::remove`] or, failing that, on drop,
/// including during unwinding.
pub struct TransientDir {
    path: PathBuf,
    removed: bool,
}

impl TransientDir {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the tree now and report the outcome.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        remove_tree(&self.path)
    }
}

impl Drop for TransientDir {
    fn drop(&mut self) {
        if !self.removed {
            if let Err(e) = remove_tree(&self.path) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove transient directory"
                );
            }
        }
    }
}
