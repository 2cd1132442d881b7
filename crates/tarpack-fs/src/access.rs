//! Up-front access checks.
//!
//! These answer "could this call succeed" before any work is done, so a
//! caller can fail fast with a precise error instead of half-way through an
//! operation.

use std::path::Path;

use crate::{Error, Result, from_io};

/// Check that `path` exists and the current user may read it.
pub fn ensure_readable(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        use nix::unistd::{AccessFlags, access};
        access(path, AccessFlags::R_OK).map_err(|errno| from_io(path, errno.into()))
    }

    #[cfg(not(unix))]
    {
        std::fs::metadata(path).map(|_| ()).map_err(|e| from_io(path, e))
    }
}

/// Check that `dir` is an existing directory the current user may create
/// files in.
pub fn ensure_writable_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    let metadata = std::fs::metadata(dir).map_err(|e| from_io(dir, e))?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    #[cfg(unix)]
    {
        use nix::unistd::{AccessFlags, access};
        access(dir, AccessFlags::W_OK | AccessFlags::X_OK)
            .map_err(|errno| from_io(dir, errno.into()))
    }

    #[cfg(not(unix))]
    {
        if metadata.permissions().readonly() {
            return Err(Error::PermissionDenied {
                path: dir.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Directory a new file at `path` would be created in.
///
/// A bare file name lives in the current directory.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
