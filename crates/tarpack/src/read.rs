//! Selecting entries out of a gzip-compressed tar stream.
//!
//! Every read is a single linear pass over the decompressed stream; there is
//! no index. Exact-name selectors end the pass at their first hit, patterns
//! see the whole archive.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::ops::ControlFlow;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, trace};

use crate::entry::{ArchiveEntry, EntryInfo, Stream};
use crate::error::{Error, Result};
use crate::selector::Selector;

pub(crate) fn open_archive(path: &Path) -> Result<Stream> {
    let not_found = |source| Error::ArchiveNotFound {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    if file.metadata().map_err(not_found)?.is_dir() {
        return Err(not_found(io::Error::from(io::ErrorKind::IsADirectory)));
    }

    debug!(archive = %path.display(), "opened archive");
    Ok(Box::new(BufReader::new(file)))
}

/// Visit entries in archive order until `visit` breaks or the stream ends.
fn scan<F>(compressed: Stream, mut visit: F) -> Result<()>
where
    F: FnMut(&mut ArchiveEntry<'_>) -> Result<ControlFlow<()>>,
{
    let decompressed: Stream = Box::new(GzDecoder::new(compressed));
    let mut archive = tar::Archive::new(decompressed);

    for entry in archive.entries()? {
        let mut entry = ArchiveEntry::new(entry?)?;
        if visit(&mut entry)?.is_break() {
            break;
        }
    }
    Ok(())
}

/// Hand every entry of `reader` that `selector` matches to `handler`.
///
/// `reader` yields the gzip-compressed archive bytes. Returns the number of
/// entries delivered, which is never zero: an empty selection is
/// [`Error::NoMatch`]. A handler error stops the scan and is returned as is.
pub fn for_each_match<R, F>(reader: R, selector: &Selector, mut handler: F) -> Result<usize>
where
    R: Read + 'static,
    F: FnMut(&mut ArchiveEntry<'_>) -> Result<()>,
{
    let mut matched = 0usize;

    scan(Box::new(reader), |entry| {
        if !selector.matches(entry.full_name()) {
            return Ok(ControlFlow::Continue(()));
        }

        matched += 1;
        trace!(entry = entry.full_name(), "matched entry");
        handler(entry)?;

        if selector.stops_at_first_match() {
            Ok(ControlFlow::Break(()))
        } else {
            Ok(ControlFlow::Continue(()))
        }
    })?;

    if matched == 0 {
        return Err(Error::NoMatch {
            pattern: selector.to_string(),
        });
    }

    debug!(%selector, matched, "selected archive entries");
    Ok(matched)
}

/// Concatenated content of every matched entry of `reader`, in archive order.
pub fn read_from_reader<R: Read + 'static>(
    reader: R,
    selector: impl Into<Selector>,
) -> Result<Vec<u8>> {
    let selector = selector.into();
    let mut content = Vec::new();

    for_each_match(reader, &selector, |entry| {
        entry.read_to_end(&mut content)?;
        Ok(())
    })?;

    Ok(content)
}

/// Read the content of the entries `selector` picks out of the archive at
/// `archive_path`.
///
/// An exact name yields the first entry with that name. A pattern yields
/// every matching entry concatenated in archive order, with no separator.
pub fn read_from_archive(
    archive_path: impl AsRef<Path>,
    selector: impl Into<Selector>,
) -> Result<Vec<u8>> {
    let stream = open_archive(archive_path.as_ref())?;
    read_from_reader(stream, selector)
}

/// Stream the selected entries of the archive at `archive_path` to `handler`
/// one at a time instead of buffering them.
pub fn read_from_archive_with<F>(
    archive_path: impl AsRef<Path>,
    selector: impl Into<Selector>,
    handler: F,
) -> Result<()>
where
    F: FnMut(&mut ArchiveEntry<'_>) -> Result<()>,
{
    let stream = open_archive(archive_path.as_ref())?;
    for_each_match(stream, &selector.into(), handler)?;
    Ok(())
}

/// Metadata of every entry in the archive, in order.
pub fn list_archive(archive_path: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let stream = open_archive(archive_path.as_ref())?;
    let mut entries = Vec::new();

    scan(stream, |entry| {
        entries.push(entry.info().clone());
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::test_support::gzipped_tar;

    fn sample() -> Vec<u8> {
        gzipped_tar(&[
            ("testing1.md", Some("hello world\n")),
            ("docs", None),
            ("docs/notes.txt", Some("notes\n")),
            ("testing2.md", Some("foobarbaz\n")),
        ])
    }

    #[test]
    fn exact_name_reads_one_entry() {
        let content = read_from_reader(Cursor::new(sample()), "testing1.md").unwrap();
        assert_eq!(content, b"hello world\n");
    }

    #[test]
    fn pattern_concatenates_in_order() {
        let selector = Selector::pattern(r"testing\d\.md").unwrap();
        let content = read_from_reader(Cursor::new(sample()), selector).unwrap();
        assert_eq!(content, b"hello world\nfoobarbaz\n");
    }

    #[test]
    fn directory_match_reads_empty() {
        let content = read_from_reader(Cursor::new(sample()), "docs").unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn no_match_carries_pattern() {
        let err = read_from_reader(Cursor::new(sample()), "foobarbaz").unwrap_err();
        assert!(matches!(&err, Error::NoMatch { pattern } if pattern == "foobarbaz"));

        let selector = Selector::pattern(r"drunken/noodle").unwrap();
        let err = read_from_reader(Cursor::new(sample()), selector).unwrap_err();
        assert!(matches!(&err, Error::NoMatch { pattern } if pattern == "/drunken/noodle/"));
        assert!(err.is_not_found());
    }

    #[test]
    fn exact_name_stops_at_first_duplicate() {
        let archive = gzipped_tar(&[
            ("dup.txt", Some("first")),
            ("dup.txt", Some("second")),
        ]);

        let content = read_from_reader(Cursor::new(archive.clone()), "dup.txt").unwrap();
        assert_eq!(content, b"first");

        let mut seen = Vec::new();
        let count = for_each_match(Cursor::new(archive), &"dup.txt".into(), |entry| {
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            seen.push(text);
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(seen, ["first"]);
    }

    #[test]
    fn pattern_visits_every_duplicate() {
        let archive = gzipped_tar(&[
            ("dup.txt", Some("first")),
            ("dup.txt", Some("second")),
        ]);
        let selector = Selector::pattern(r"^dup").unwrap();

        let mut seen = Vec::new();
        let count = for_each_match(Cursor::new(archive), &selector, |entry| {
            seen.push(entry.full_name().to_owned());
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen, ["dup.txt", "dup.txt"]);
    }

    #[test]
    fn handler_error_aborts_scan() {
        let mut calls = 0;
        let result = for_each_match(Cursor::new(sample()), &Selector::All, |_| {
            calls += 1;
            Err(Error::Io(io::Error::other("stop")))
        });

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn corrupt_stream_is_io_error() {
        let result = read_from_reader(Cursor::new(vec![0xDE, 0xAD, 0xBE, 0xEF]), "x");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn missing_archive_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_from_archive(dir.path().join("foobarbaz.tar.gz"), "foo");
        assert!(matches!(result, Err(Error::ArchiveNotFound { .. })));
    }

    #[test]
    fn directory_as_archive_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_from_archive(dir.path(), "foo");
        assert!(matches!(result, Err(Error::ArchiveNotFound { .. })));
    }

    #[test]
    fn list_reports_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tar.gz");
        std::fs::write(&path, sample()).unwrap();

        let names: Vec<_> = list_archive(&path)
            .unwrap()
            .into_iter()
            .map(|e| (e.full_name.clone(), e.is_directory()))
            .collect();

        assert_eq!(
            names,
            [
                ("testing1.md".to_owned(), false),
                ("docs".to_owned(), true),
                ("docs/notes.txt".to_owned(), false),
                ("testing2.md".to_owned(), false),
            ]
        );
    }

    #[test]
    fn list_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.tar.gz");
        std::fs::write(&path, gzipped_tar(&[])).unwrap();
        assert!(list_archive(&path).unwrap().is_empty());
    }
}
