use std::fs::File;
use std::io;
use std::path::Path;

use crate::access::parent_dir;
use crate::{Error, Result};

#[cfg(unix)]
const DEFAULT_PERMISSIONS: Option<u32> = Some(0o644);

#[cfg(not(unix))]
const DEFAULT_PERMISSIONS: Option<u32> = None;

#[derive(Clone, Copy, Debug)]
pub struct AtomicWriteOptions {
    permissions: Option<u32>,
    prefix: &'static str,
    suffix: &'static str,
    sync: bool,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self {
            permissions: DEFAULT_PERMISSIONS,
            prefix: ".",
            suffix: ".tmp",
            sync: false,
        }
    }

    /// Mode bits applied before the file is moved into place. Ignored off unix.
    pub fn permissions(mut self, mode: u32) -> Self {
        self.permissions = Some(mode);
        self
    }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write a file through `write` and move it over `path` only once every byte
/// is on disk.
///
/// The temporary file is created next to `path` so the final rename never
/// crosses a filesystem. If `write` fails the temporary is deleted and `path`
/// is left untouched.
pub fn atomic_write<F>(path: impl AsRef<Path>, options: AtomicWriteOptions, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    let parent = parent_dir(path);

    let mut tmp = tempfile::Builder::new()
        .prefix(options.prefix)
        .suffix(options.suffix)
        .tempfile_in(parent)
        .map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;

    write(tmp.as_file_mut()).map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    if let Some(mode) = options.permissions {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(|e| Error::Write {
                path: tmp.path().to_path_buf(),
                source: e,
            })?;
    }

    if options.sync {
        tmp.as_file().sync_all().map_err(|e| Error::Write {
            path: tmp.path().to_path_buf(),
            source: e,
        })?;
    }

    tmp.persist(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::trace!(path = %path.display(), "placed file atomically");
    Ok(())
}
