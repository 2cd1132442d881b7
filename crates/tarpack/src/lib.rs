//! Pack directory trees into gzip-compressed tar archives, and read or
//! extract entries back out by exact name or pattern.
//!
//! # Architecture
//!
//! - `create.rs` - Directory walk, tar spooling and gzip compression
//! - `read.rs` - Linear entry scan with [`Selector`] matching, buffered or streamed
//! - `extract.rs` - Materializing matches on disk, including transient extraction
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `selector.rs`, `entry.rs`, `options.rs` - Shared types
//!
//! # Example
//!
//! ```no_run
//! use tarpack::{Selector, create_archive, extract_transient, read_from_archive};
//!
//! fn main() -> tarpack::Result<()> {
//!     let archive = create_archive("site", "site.tar.gz")?;
//!
//!     let index = read_from_archive(&archive, "index.html")?;
//!     let styles = read_from_archive(&archive, Selector::pattern(r"\.css$")?)?;
//!     println!("{} + {} bytes", index.len(), styles.len());
//!
//!     extract_transient(&archive, "scratch", Selector::All, || {
//!         // everything under scratch/ exists only for the duration of this closure
//!     })?;
//!     Ok(())
//! }
//! ```

pub use create::{create_archive, create_archive_with_options};
pub use entry::{ArchiveEntry, EntryInfo, EntryKind};
pub use error::{Error, Result};
pub use extract::{
    extract_from_archive, extract_from_archive_with_options, extract_transient,
    extract_transient_with_options,
};
pub use options::{CreateOptions, ExtractOptions, PermissionStrategy};
pub use read::{
    for_each_match, list_archive, read_from_archive, read_from_archive_with, read_from_reader,
};
pub use sanitize::{SanitizedPath, sanitize_path, sanitize_symlink_target};
pub use selector::Selector;

mod create;
pub mod entry;
mod error;
mod extract;
pub mod options;
mod read;
mod sanitize;
mod selector;
#[cfg(test)]
mod test_support;
