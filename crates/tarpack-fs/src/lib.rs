//! Filesystem primitives used by tarpack.
//!
//! - `access` - fail-fast readability and writability checks
//! - `primitives` - atomic file placement and recursive removal
//! - `transient` - a directory guard that deletes its tree on drop

mod access;
mod error;
pub mod primitives;
mod transient;

pub use access::{ensure_readable, ensure_writable_dir, parent_dir};
pub use error::{Error, Result, from_io};
pub use primitives::{AtomicWriteOptions, atomic_write, remove_tree};
pub use transient::TransientDir;
