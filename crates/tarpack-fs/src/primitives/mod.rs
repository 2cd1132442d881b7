pub mod atomic_write;
pub mod remove_tree;

pub use atomic_write::{AtomicWriteOptions, atomic_write};
pub use remove_tree::remove_tree;
