use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source path not found or unreadable: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("archive not found or unreadable: {}: {source}", path.display())]
    ArchiveNotFound { path: PathBuf, source: io::Error },

    #[error("no archive entries match {pattern}")]
    NoMatch { pattern: String },

    #[error("permission denied: cannot write archive {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(
        "zip-slip attack detected: entry '{}' resolves outside '{}'",
        entry.display(),
        destination.display()
    )]
    ZipSlip { entry: PathBuf, destination: PathBuf },

    #[error("symlink target escapes destination: '{}' -> '{}'", link.display(), target.display())]
    SymlinkEscape { target: PathBuf, link: PathBuf },

    #[error("strip_components({count}) removed all path components from '{}'", original.display())]
    NoComponentsRemaining { original: PathBuf, count: usize },

    #[error("failed to extract '{}': {source}", path.display())]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{}': {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to create symlink '{}' -> '{}': {source}", link.display(), target.display())]
    SymlinkCreationFailed {
        target: PathBuf,
        link: PathBuf,
        source: io::Error,
    },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Fs(#[from] tarpack_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// True for every "nothing there" failure: a missing source, an archive
    /// that cannot be opened, or a selector that matched no entry.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. } | Self::ArchiveNotFound { .. } | Self::NoMatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
