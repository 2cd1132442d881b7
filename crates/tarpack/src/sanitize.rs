use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    /// The name as stored in the archive.
    pub original: PathBuf,
    /// Normalized path relative to the destination, after stripping.
    pub relative: PathBuf,
    /// Where the entry lands on disk.
    pub resolved: PathBuf,
}

/// Map an entry name onto `destination`.
///
/// Absolute names and names whose `..` components climb above the
/// destination root are rejected, then `strip_components` leading components
/// are dropped.
pub fn sanitize_path(
    entry_name: &str,
    destination: &Path,
    strip_components: usize,
) -> Result<SanitizedPath> {
    let original = PathBuf::from(entry_name);

    let normalized = normalize_relative(&original).ok_or_else(|| Error::ZipSlip {
        entry: original.clone(),
        destination: destination.to_path_buf(),
    })?;

    let relative = if strip_components > 0 {
        strip_leading(&normalized, strip_components).ok_or_else(|| {
            Error::NoComponentsRemaining {
                original: original.clone(),
                count: strip_components,
            }
        })?
    } else {
        normalized
    };

    let resolved = destination.join(&relative);
    Ok(SanitizedPath {
        original,
        relative,
        resolved,
    })
}

/// Validate a symlink target recorded for the entry at `link_relative`.
///
/// The target is kept as recorded, but it must be relative and must resolve
/// inside the destination tree when followed from the link's directory.
pub fn sanitize_symlink_target(target: &Path, link_relative: &Path) -> Result<PathBuf> {
    let escape = || Error::SymlinkEscape {
        target: target.to_path_buf(),
        link: link_relative.to_path_buf(),
    };

    if target.is_absolute() {
        return Err(escape());
    }

    let base = link_relative.parent().unwrap_or(Path::new(""));
    normalize_relative(&base.join(target)).ok_or_else(escape)?;

    Ok(target.to_path_buf())
}

/// Resolve `.` and `..` lexically. `None` if the path is rooted or climbs
/// above its starting point.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

fn strip_leading(path: &Path, count: usize) -> Option<PathBuf> {
    let components: Vec<_> = path.components().collect();
    if components.len() <= count {
        return None;
    }
    Some(components[count..].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> &'static Path {
        Path::new("/opt/myapp")
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_path("bin/tool", base(), 0).unwrap();
        assert_eq!(result.original, Path::new("bin/tool"));
        assert_eq!(result.resolved, base().join("bin/tool"));
    }

    #[test]
    fn inner_parent_dirs_are_resolved() {
        let result = sanitize_path("a/./b/../c.txt", base(), 0).unwrap();
        assert_eq!(result.relative, Path::new("a/c.txt"));
    }

    #[test]
    fn relative_destination_is_kept() {
        let result = sanitize_path("x.txt", Path::new("../out"), 0).unwrap();
        assert_eq!(result.resolved, Path::new("../out/x.txt"));
    }

    #[test]
    fn path_with_component_stripping() {
        let result = sanitize_path("tool-1.0/bin/tool", base(), 1).unwrap();
        assert_eq!(result.relative, Path::new("bin/tool"));
    }

    #[test]
    fn stripping_everything_is_reported() {
        let result = sanitize_path("tool-1.0", base(), 1);
        assert!(matches!(result, Err(Error::NoComponentsRemaining { count: 1, .. })));
    }

    #[test]
    fn zip_slip_protection() {
        assert!(matches!(
            sanitize_path("/etc/passwd", base(), 0),
            Err(Error::ZipSlip { .. })
        ));
        assert!(matches!(
            sanitize_path("a/../../etc/passwd", base(), 0),
            Err(Error::ZipSlip { .. })
        ));
    }

    #[test]
    fn symlink_target_inside_tree() {
        let target = sanitize_symlink_target(Path::new("../lib/lib.so"), Path::new("bin/mylink"))
            .unwrap();
        assert_eq!(target, Path::new("../lib/lib.so"));
    }

    #[test]
    fn symlink_target_escaping_tree() {
        let result = sanitize_symlink_target(Path::new("../../etc"), Path::new("bin/mylink"));
        assert!(matches!(result, Err(Error::SymlinkEscape { .. })));
    }

    #[test]
    fn symlink_absolute_target_rejected() {
        let result = sanitize_symlink_target(Path::new("/etc/passwd"), Path::new("bin/mylink"));
        assert!(matches!(result, Err(Error::SymlinkEscape { .. })));
    }
}
