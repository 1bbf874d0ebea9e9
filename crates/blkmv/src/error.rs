//! Error taxonomy for one run.
//!
//! Structural errors abort the run before any mutation. [`FileOpError`] is
//! the only per-item error and never aborts sibling operations.
//! [`DirectoryCreateError`] aborts the remainder of reconciliation.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A directory could not be opened while walking.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("could not open directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("could not resolve `{}`: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read metadata of `{}`: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The temporary listing file could not be produced or read back.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to write listing file: {0}")]
    Write(#[source] io::Error),

    #[error("failed to read listing file: {0}")]
    Read(#[source] io::Error),

    #[error("listing is not valid UTF-8")]
    NotUtf8,

    #[error("listing does not end with a newline")]
    Unterminated,
}

/// The external editor did not complete successfully.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no editor command configured")]
    NoEditor,

    #[error("editor command `{0}` has unbalanced quotes")]
    InvalidCommand(String),

    #[error("editor command not found: {0}")]
    NotFound(String),

    #[error("failed to spawn editor `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("editor exited with {0}, no action taken")]
    Aborted(ExitStatus),
}

/// The edited listing does not have one line per original entry.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("line count has been changed ({found} lines for {expected} entries), no action taken")]
pub struct ListingMismatchError {
    pub expected: usize,
    pub found: usize,
}

/// Per-item operation that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileOp {
    Rename,
    Delete,
    RemoveDir,
}

/// An individual rename, delete, or empty-directory removal failed.
#[derive(Debug, Error)]
#[error("{op:?} of `{path}` failed: {source}")]
pub struct FileOpError {
    pub op: FileOp,
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// A required parent directory could not be created.
#[derive(Debug, Error)]
#[error("failed to create directory `{path}`: {source}")]
pub struct DirectoryCreateError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Fatal error for a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Mismatch(#[from] ListingMismatchError),

    #[error(transparent)]
    DirectoryCreate(#[from] DirectoryCreateError),
}
