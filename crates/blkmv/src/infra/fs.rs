//! Filesystem mutation boundary used by the reconciler.

use std::fs;
use std::io;
use std::path::Path;

/// Filesystem primitives consumed by reconciliation.
///
/// Production uses [`RealFileSystem`], while tests can inject
/// `MockFileSystem` to assert exactly which calls happen.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Returns whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Renames or moves `from` to `to`, overwriting what the platform
    /// overwrites.
    ///
    /// # Errors
    /// Returns the underlying rename error.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Removes the file at `path`, or the directory at `path` when it is
    /// empty. Never removes recursively.
    ///
    /// # Errors
    /// Returns the underlying removal error.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Creates `path` and any missing ancestors.
    ///
    /// # Errors
    /// Returns the underlying creation error.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Returns whether `path` is a directory without entries.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be listed.
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;

    /// Removes the empty directory at `path`.
    ///
    /// # Errors
    /// Returns an error when the directory is missing or not empty.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if path.symlink_metadata()?.is_dir() {
            return fs::remove_dir(path);
        }

        fs::remove_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::read_dir(path)?.next().is_none())
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}
