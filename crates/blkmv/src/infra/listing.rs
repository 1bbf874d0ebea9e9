//! Newline-delimited listing exchanged with the editor.
//!
//! The listing is a byte-exact contract: one entry path per line, every line
//! terminated by `\n`, nothing else.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::entry::Entry;
use crate::error::{ListingError, ListingMismatchError};

const LISTING_PREFIX: &str = "blkmv-";
const LISTING_SUFFIX: &str = ".txt";

/// Renders entries as one path per line, in sequence order.
pub fn render(entries: &[Entry]) -> String {
    let capacity = entries.iter().map(|entry| entry.path().len() + 1).sum();
    let mut listing = String::with_capacity(capacity);
    for entry in entries {
        listing.push_str(entry.path());
        listing.push('\n');
    }

    listing
}

/// Splits an edited buffer into its lines, excluding the newlines.
///
/// # Errors
/// Returns [`ListingError::NotUtf8`] for invalid UTF-8 and
/// [`ListingError::Unterminated`] when the buffer does not end right after a
/// newline.
pub fn parse(buffer: &[u8]) -> Result<Vec<String>, ListingError> {
    let text = std::str::from_utf8(buffer).map_err(|_| ListingError::NotUtf8)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if !text.ends_with('\n') {
        return Err(ListingError::Unterminated);
    }

    Ok(text.split_terminator('\n').map(str::to_string).collect())
}

/// Checks the one-line-per-entry invariant.
///
/// # Errors
/// Returns [`ListingMismatchError`] when the counts differ.
pub fn ensure_same_length(
    original: &[Entry],
    edited: &[String],
) -> Result<(), ListingMismatchError> {
    if original.len() == edited.len() {
        return Ok(());
    }

    Err(ListingMismatchError {
        expected: original.len(),
        found: edited.len(),
    })
}

/// Temporary listing file handed to the editor.
///
/// The file is removed when this value is dropped, on every exit path.
pub struct ListingFile {
    file: NamedTempFile,
}

impl ListingFile {
    /// Creates a uniquely named temporary file holding `listing`.
    ///
    /// # Errors
    /// Returns [`ListingError::Write`] when the file cannot be created or
    /// written.
    pub fn create(listing: &str) -> Result<Self, ListingError> {
        let mut file = tempfile::Builder::new()
            .prefix(LISTING_PREFIX)
            .suffix(LISTING_SUFFIX)
            .tempfile()
            .map_err(ListingError::Write)?;
        file.write_all(listing.as_bytes())
            .map_err(ListingError::Write)?;
        file.flush().map_err(ListingError::Write)?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the file back by path, so editors that replace the file instead
    /// of writing in place are handled.
    ///
    /// # Errors
    /// Returns [`ListingError::Read`] when the file is gone or unreadable.
    pub fn read_back(&self) -> Result<Vec<u8>, ListingError> {
        fs::read(self.path()).map_err(ListingError::Read)
    }
}
