use std::fs;
use std::io;
use std::path::Path;

use crate::{Error, Result};

/// Remove `path` and everything below it.
///
/// The path itself is inspected without following symlinks: a symlink is
/// unlinked, never traversed. A path that is already gone counts as removed.
pub fn remove_tree(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(Error::Remove {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match removed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_nested_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/c.txt"), "c").unwrap();

        remove_tree(&root).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn removes_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "f").unwrap();

        remove_tree(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn missing_path_is_ok() {
        let dir = tempdir().unwrap();
        remove_tree(dir.path().join("gone")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_not_followed() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "keep").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_tree(&link).unwrap();
        assert!(!link.exists());
        assert!(target.join("keep.txt").exists());
    }
}
