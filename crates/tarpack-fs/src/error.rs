use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to access '{}': {source}", path.display())]
    Access { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to remove '{}': {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classify an I/O failure on `path` by its kind.
pub fn from_io(path: &Path, err: io::Error) -> Error {
    let path = path.to_path_buf();
    match err.kind() {
        io::ErrorKind::NotFound => Error::NotFound { path },
        io::ErrorKind::PermissionDenied => Error::PermissionDenied { path },
        io::ErrorKind::NotADirectory => Error::NotADirectory { path },
        _ => Error::Access { path, source: err },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_maps_kinds() {
        let path = Path::new("/tmp/x");
        assert!(matches!(
            from_io(path, io::Error::from(io::ErrorKind::NotFound)),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            from_io(path, io::Error::from(io::ErrorKind::PermissionDenied)),
            Error::PermissionDenied { .. }
        ));
        assert!(matches!(
            from_io(path, io::Error::other("boom")),
            Error::Access { .. }
        ));
    }

    #[test]
    fn error_messages_carry_path() {
        let err = Error::NotFound {
            path: PathBuf::from("missing/dir"),
        };
        assert_eq!(err.to_string(), "path not found: missing/dir");
    }
}
