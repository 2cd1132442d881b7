use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// The decompressed byte stream a tar archive is read from.
pub(crate) type Stream = Box<dyn Read>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink { target: PathBuf },
    /// Hard links, devices, FIFOs and anything else without plain content.
    Other,
}

/// Owned metadata of one archive entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    /// Name exactly as stored, so directories often keep a trailing `/`.
    pub full_name: String,
    pub kind: EntryKind,
    pub mode: u32,
    pub size: u64,
}

impl EntryInfo {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.kind, EntryKind::Symlink { .. })
    }

    pub fn symlink_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } => Some(target),
            _ => None,
        }
    }

    /// Check if entry is executable (has execute bit set)
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }
}

/// An entry positioned in the open archive stream.
///
/// Reading from it yields the entry's content; directories read as empty.
/// It borrows the stream, so it only lives for one step of the scan.
pub struct ArchiveEntry<'a> {
    info: EntryInfo,
    inner: tar::Entry<'a, Stream>,
}

impl<'a> ArchiveEntry<'a> {
    pub(crate) fn new(inner: tar::Entry<'a, Stream>) -> io::Result<Self> {
        let full_name = String::from_utf8_lossy(&inner.path_bytes()).into_owned();

        let header = inner.header();
        let entry_type = header.entry_type();
        let mode = header.mode()? & 0o7777;

        let kind = if entry_type.is_dir() {
            EntryKind::Directory
        } else if entry_type.is_file() || entry_type.is_contiguous() {
            EntryKind::File
        } else if entry_type.is_symlink() {
            match inner.link_name()? {
                Some(target) => EntryKind::Symlink {
                    target: target.into_owned(),
                },
                None => EntryKind::Other,
            }
        } else {
            EntryKind::Other
        };

        let info = EntryInfo {
            full_name,
            kind,
            mode,
            size: inner.size(),
        };

        Ok(Self { info, inner })
    }

    /// Relative path of the entry as stored in the archive.
    pub fn full_name(&self) -> &str {
        &self.info.full_name
    }

    pub fn kind(&self) -> &EntryKind {
        &self.info.kind
    }

    pub fn is_directory(&self) -> bool {
        self.info.is_directory()
    }

    pub fn mode(&self) -> u32 {
        self.info.mode
    }

    pub fn size(&self) -> u64 {
        self.info.size
    }

    pub fn info(&self) -> &EntryInfo {
        &self.info
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
