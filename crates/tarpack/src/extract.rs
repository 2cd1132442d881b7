//! Materializing selected archive entries on disk.
//!
//! # Platform Behavior
//!
//! **Unix**: `PermissionStrategy::Preserve` applies archived mode bits, and
//! symlink entries are recreated when their target stays inside the
//! destination.
//!
//! **Other platforms**: mode bits are ignored and symlink entries are skipped.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tarpack_fs::TransientDir;
use tracing::{debug, trace, warn};

use crate::entry::{ArchiveEntry, EntryKind};
use crate::error::{Error, Result};
use crate::options::{ExtractOptions, PermissionStrategy};
use crate::read::{for_each_match, open_archive};
use crate::sanitize::{SanitizedPath, sanitize_path};
use crate::selector::Selector;

/// Extract the entries `selector` picks from the archive at `archive_path`
/// into `destination`, returning `destination`.
///
/// Pass [`Selector::All`] (or `Selector::default()`) to extract everything.
pub fn extract_from_archive(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    selector: impl Into<Selector>,
) -> Result<PathBuf> {
    extract_from_archive_with_options(
        archive_path,
        destination,
        selector,
        &ExtractOptions::default(),
    )
}

pub fn extract_from_archive_with_options(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    selector: impl Into<Selector>,
    options: &ExtractOptions,
) -> Result<PathBuf> {
    let destination = destination.as_ref();
    let selector = selector.into();
    let stream = open_archive(archive_path.as_ref())?;

    let mut directory_modes = Vec::new();
    let mut written = 0usize;

    for_each_match(stream, &selector, |entry| {
        let stripped = sanitize_path(entry.full_name(), destination, options.strip_components);
        let target = match stripped {
            Ok(target) => target,
            Err(Error::NoComponentsRemaining { original, .. }) => {
                trace!(entry = %original.display(), "nothing left after stripping, skipped");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Files and links replace a symlink at their own path; directories
        // would be created through it.
        let replaces_last = !entry.is_directory();
        if crosses_symlink(destination, &target.relative, replaces_last)? {
            return Err(Error::ZipSlip {
                entry: target.original,
                destination: destination.to_path_buf(),
            });
        }

        match entry.kind().clone() {
            EntryKind::Directory => {
                ensure_directory(&target.resolved)?;
                if options.permission_strategy == PermissionStrategy::Preserve {
                    directory_modes.push((target.resolved, entry.mode()));
                }
            }
            EntryKind::File => {
                write_file(entry, &target.resolved)?;
                options
                    .permission_strategy
                    .apply(&target.resolved, entry.mode())
                    .map_err(|e| Error::ExtractionFailed {
                        path: target.resolved.clone(),
                        source: e,
                    })?;
            }
            EntryKind::Symlink { target: link_target } => {
                write_symlink(destination, &link_target, &target)?;
            }
            EntryKind::Other => {
                warn!(entry = entry.full_name(), "unsupported entry type, skipped");
                return Ok(());
            }
        }

        written += 1;
        Ok(())
    })?;

    // Directory modes go last so a read-only directory does not block the
    // entries extracted into it.
    for (path, mode) in directory_modes.into_iter().rev() {
        PermissionStrategy::Preserve
            .apply(&path, mode)
            .map_err(|e| Error::ExtractionFailed { path, source: e })?;
    }

    debug!(destination = %destination.display(), written, "extracted archive entries");
    Ok(destination.to_path_buf())
}

/// Extract, hand control to `action`, then delete `destination`.
///
/// Nothing extracted survives this call. Removal is best effort: a failure
/// is logged rather than returned, and it also runs if `action` panics.
/// Returns `None` without calling `action` when extraction left no
/// `destination` behind.
pub fn extract_transient<F, T>(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    selector: impl Into<Selector>,
    action: F,
) -> Result<Option<T>>
where
    F: FnOnce() -> T,
{
    extract_transient_with_options(
        archive_path,
        destination,
        selector,
        &ExtractOptions::default(),
        action,
    )
}

pub fn extract_transient_with_options<F, T>(
    archive_path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    selector: impl Into<Selector>,
    options: &ExtractOptions,
    action: F,
) -> Result<Option<T>>
where
    F: FnOnce() -> T,
{
    let destination =
        extract_from_archive_with_options(archive_path, destination, selector, options)?;

    if !destination.exists() {
        debug!(destination = %destination.display(), "nothing extracted, action skipped");
        return Ok(None);
    }

    let transient = TransientDir::new(&destination);
    let output = action();

    if let Err(e) = transient.remove() {
        warn!(destination = %destination.display(), error = %e, "failed to remove extracted tree");
    }

    Ok(Some(output))
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_file(entry: &mut ArchiveEntry<'_>, target_path: &Path) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        ensure_directory(parent)?;
    }
    unlink_symlink(target_path)?;

    let mut file = File::create(target_path).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })?;
    io::copy(entry, &mut file).map_err(|e| Error::ExtractionFailed {
        path: target_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Remove a symlink already sitting at `path` so writes never go through it.
fn unlink_symlink(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::remove_file(path).map_err(|e| Error::ExtractionFailed {
                path: path.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

/// Walk `relative` below `destination` and report whether any component
/// already on disk is a symlink. Earlier entries may have planted links that
/// a lexically clean path would otherwise be written through. With
/// `skip_last` the final component may be a symlink.
fn crosses_symlink(destination: &Path, relative: &Path, skip_last: bool) -> Result<bool> {
    let mut current = destination.to_path_buf();
    let mut depth = 0usize;
    let mut components = relative.components().peekable();

    while let Some(component) = components.next() {
        match component {
            Component::Normal(part) => {
                current.push(part);
                depth += 1;
            }
            Component::CurDir => continue,
            Component::ParentDir if depth > 0 => {
                current.pop();
                depth -= 1;
                continue;
            }
            _ => return Ok(true),
        }

        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Ok(!(skip_last && components.peek().is_none()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(Error::ExtractionFailed {
                    path: current,
                    source: e,
                });
            }
        }
    }
    Ok(false)
}

#[cfg(unix)]
fn write_symlink(destination: &Path, link_target: &Path, link: &SanitizedPath) -> Result<()> {
    let target = crate::sanitize::sanitize_symlink_target(link_target, &link.relative)?;

    // The target text is checked lexically above. It may name a link that
    // was already extracted, but must not pass through one.
    let base = link.relative.parent().unwrap_or(Path::new(""));
    if crosses_symlink(destination, &base.join(&target), true)? {
        return Err(Error::SymlinkEscape {
            target,
            link: link.relative.clone(),
        });
    }

    if let Some(parent) = link.resolved.parent() {
        ensure_directory(parent)?;
    }
    unlink_symlink(&link.resolved)?;

    std::os::unix::fs::symlink(&target, &link.resolved).map_err(|e| {
        Error::SymlinkCreationFailed {
            target,
            link: link.resolved.clone(),
            source: e,
        }
    })
}

#[cfg(not(unix))]
fn write_symlink(_destination: &Path, link_target: &Path, link: &SanitizedPath) -> Result<()> {
    warn!(
        link = %link.original.display(),
        target = %link_target.display(),
        "symlinks are not extracted on this platform, skipped"
    );
    Ok(())
}
