use std::io;
use std::path::Path;

/// How archived mode bits are treated on extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PermissionStrategy {
    /// Restore content only; new files and directories get the process
    /// defaults (umask on unix).
    #[default]
    Ignore,
    /// Apply the archived mode bits. No-op off unix.
    Preserve,
}

impl PermissionStrategy {
    pub(crate) fn apply(self, path: &Path, mode: u32) -> io::Result<()> {
        match self {
            Self::Ignore => Ok(()),
            Self::Preserve => set_mode(path, mode),
        }
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    pub permission_strategy: PermissionStrategy,
    pub strip_components: usize,
}

impl ExtractOptions {
    pub fn permission_strategy(mut self, strategy: PermissionStrategy) -> Self {
        self.permission_strategy = strategy;
        self
    }

    /// Drop `n` leading path components from every entry; entries with no
    /// components left are skipped.
    pub fn strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }
}

pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
pub const DEFAULT_SPOOL_THRESHOLD: usize = 8 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct CreateOptions {
    /// gzip level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Archive what symlinks point to rather than the links themselves.
    pub follow_links: bool,
    /// Bytes of uncompressed tar kept in memory before spilling to disk.
    pub spool_threshold: usize,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            follow_links: true,
            spool_threshold: DEFAULT_SPOOL_THRESHOLD,
        }
    }
}

impl CreateOptions {
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn spool_threshold(mut self, bytes: usize) -> Self {
        self.spool_threshold = bytes;
        self
    }
}
