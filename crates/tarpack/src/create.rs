use std::fs::{self, File, Metadata};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};
use tarpack_fs::{AtomicWriteOptions, from_io};
use tempfile::SpooledTempFile;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::options::CreateOptions;

/// Pack everything below `source_path` into a gzip-compressed tar at
/// `archive_path`, replacing any file already there. Returns `archive_path`.
pub fn create_archive(
    source_path: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
) -> Result<PathBuf> {
    create_archive_with_options(source_path, archive_path, &CreateOptions::default())
}

pub fn create_archive_with_options(
    source_path: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
    options: &CreateOptions,
) -> Result<PathBuf> {
    let source = source_path.as_ref();
    let archive = archive_path.as_ref();

    tarpack_fs::ensure_readable(source).map_err(|_| Error::SourceNotFound {
        path: source.to_path_buf(),
    })?;
    tarpack_fs::ensure_writable_dir(tarpack_fs::parent_dir(archive)).map_err(|_| {
        Error::PermissionDenied {
            path: archive.to_path_buf(),
        }
    })?;

    let mut builder = tar::Builder::new(SpooledTempFile::new(options.spool_threshold));
    let mut count = 0usize;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        let relative = path.strip_prefix(source).unwrap_or(path);
        let file_type = entry.file_type();
        let metadata = entry.metadata()?;

        if file_type.is_dir() {
            let mut header = header_for(&metadata, EntryType::Directory, 0);
            builder.append_data(&mut header, relative, io::empty())?;
        } else if file_type.is_file() {
            let file = File::open(path).map_err(|e| from_io(path, e))?;
            let size = metadata.len();
            let mut header = header_for(&metadata, EntryType::Regular, size);
            builder
                .append_data(&mut header, relative, SizedReader::new(file, size))
                .map_err(|e| from_io(path, e))?;
        } else if file_type.is_symlink() {
            let target = fs::read_link(path).map_err(|e| from_io(path, e))?;
            let mut header = header_for(&metadata, EntryType::Symlink, 0);
            builder.append_link(&mut header, relative, &target)?;
        } else {
            warn!(path = %path.display(), "not a file, directory or symlink, skipped");
            continue;
        }

        trace!(entry = %relative.display(), "archived");
        count += 1;
    }

    let mut spool = builder.into_inner()?;
    spool.rewind()?;

    let level = Compression::new(options.compression_level);
    tarpack_fs::atomic_write(
        archive,
        AtomicWriteOptions::new().prefix(".tarpack-").suffix(".tar.gz.tmp"),
        |file| {
            let mut encoder = GzEncoder::new(file, level);
            io::copy(&mut spool, &mut encoder)?;
            encoder.finish()?;
            Ok(())
        },
    )?;

    debug!(
        source = %source.display(),
        archive = %archive.display(),
        entries = count,
        "created archive"
    );
    Ok(archive.to_path_buf())
}

/// Yields exactly the `size` bytes recorded in the header. A file that
/// shrinks after its size was taken fails instead of leaving a short entry.
struct SizedReader<R> {
    inner: io::Take<R>,
    remaining: u64,
}

impl<R: Read> SizedReader<R> {
    fn new(inner: R, size: u64) -> Self {
        Self {
            inner: inner.take(size),
            remaining: size,
        }
    }
}

impl<R: Read> Read for SizedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && self.remaining > 0 && !buf.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while archiving, {} bytes missing", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

fn header_for(metadata: &Metadata, entry_type: EntryType, size: u64) -> Header {
    let mut header = Header::new_ustar();
    header.set_entry_type(entry_type);
    header.set_mode(mode_of(metadata));
    header.set_size(size);
    header.set_mtime(
        metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs()),
    );
    header
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
