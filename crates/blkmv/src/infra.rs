//! Infrastructure adapters for the filesystem walk, listing file, editor,
//! and filesystem mutations.

/// Recursive entry discovery.
pub mod discovery;
pub mod editor;
pub mod fs;
/// Listing codec and temporary listing file.
pub mod listing;
