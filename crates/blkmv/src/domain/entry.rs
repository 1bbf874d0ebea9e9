use std::time::SystemTime;

/// Metadata an [`Entry`] carries for the active ordering mode.
///
/// Only the key the ordering needs is fetched, so name-ordered runs never
/// stat their entries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortKey {
    /// No extra data; name ordering compares the path itself.
    #[default]
    Name,
    /// Byte length of the entry.
    Size(u64),
    /// Last-modification timestamp of the entry.
    ModTime(SystemTime),
}

/// One discovered filesystem object eligible for listing and reconciliation.
///
/// Entries are immutable once created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    path: String,
    depth: usize,
    sort_key: SortKey,
}

impl Entry {
    /// Creates an entry for `path` with a name-only sort key.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_sort_key(path, SortKey::Name)
    }

    /// Creates an entry for `path` carrying `sort_key`.
    pub fn with_sort_key(path: impl Into<String>, sort_key: SortKey) -> Self {
        let path = path.into();
        let depth = path.matches('/').count();

        Self {
            path,
            depth,
            sort_key,
        }
    }

    /// Listing path, relative to the base directory or absolute in
    /// full-path mode.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of `/` separators in [`Entry::path`].
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map_or(self.path.as_str(), |(_, name)| name)
    }

    /// Text after the final `.` of the file name, or `""` without a dot.
    pub fn extension(&self) -> &str {
        self.file_name()
            .rsplit_once('.')
            .map_or("", |(_, extension)| extension)
    }

    /// Byte length, when the sort key carries it.
    pub fn size(&self) -> Option<u64> {
        match self.sort_key {
            SortKey::Size(size) => Some(size),
            SortKey::Name | SortKey::ModTime(_) => None,
        }
    }

    /// Modification time, when the sort key carries it.
    pub fn modified(&self) -> Option<SystemTime> {
        match self.sort_key {
            SortKey::ModTime(modified) => Some(modified),
            SortKey::Name | SortKey::Size(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_depth_counts_separators() {
        // Arrange & Act
        let shallow = Entry::new("a.txt");
        let nested = Entry::new("a/b/c.txt");

        // Assert
        assert_eq!(shallow.depth(), 0);
        assert_eq!(nested.depth(), 2);
    }

    #[test]
    fn test_entry_extension_uses_final_dot_of_file_name() {
        // Arrange
        let archive = Entry::new("backups/site.tar.gz");
        let dotted_dir = Entry::new("v1.2/README");

        // Act & Assert
        assert_eq!(archive.extension(), "gz");
        assert_eq!(dotted_dir.extension(), "");
    }

    #[test]
    fn test_entry_size_and_modified_follow_sort_key() {
        // Arrange
        let sized = Entry::with_sort_key("a.bin", SortKey::Size(42));
        let timed = Entry::with_sort_key("b.bin", SortKey::ModTime(SystemTime::UNIX_EPOCH));

        // Act & Assert
        assert_eq!(sized.size(), Some(42));
        assert_eq!(sized.modified(), None);
        assert_eq!(timed.modified(), Some(SystemTime::UNIX_EPOCH));
        assert_eq!(timed.size(), None);
    }
}
