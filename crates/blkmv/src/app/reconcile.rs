//! Reconciliation of the edited listing back into filesystem operations.
//!
//! Renames and deletes are independent best-effort operations: a failure is
//! recorded and processing moves on to the next line. A parent directory
//! that cannot be created is a structural failure instead, and aborts the
//! remaining lines.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::action::{ActionEvent, ActionSink};
use crate::domain::entry::Entry;
use crate::error::{DirectoryCreateError, FileOp, FileOpError, RunError};
use crate::infra::fs::FileSystem;
use crate::infra::listing::ensure_same_length;

/// Leading character that marks an edited line for deletion.
pub const DELETE_SENTINEL: char = '#';

/// What one edited line asks for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change<'a> {
    Unchanged,
    Delete { path: &'a str },
    Rename { from: &'a str, to: &'a str },
}

impl<'a> Change<'a> {
    /// Classifies the edited line `new` against the original path `old`.
    pub fn classify(old: &'a str, new: &'a str) -> Self {
        if old == new {
            return Self::Unchanged;
        }
        if new.starts_with(DELETE_SENTINEL) {
            return Self::Delete { path: old };
        }

        Self::Rename { from: old, to: new }
    }
}

/// Optional directory handling around renames.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileOptions {
    /// Creates a missing parent directory of a rename target.
    pub make_dirs: bool,
    /// Removes ancestors of a moved entry that became empty.
    pub prune_empty: bool,
}

/// Per-run tally of what reconciliation did.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub unchanged: usize,
    pub renamed: usize,
    pub deleted: usize,
    pub created_dirs: usize,
    pub removed_dirs: usize,
    pub failures: Vec<FileOpError>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies an edited listing to the filesystem below `base`.
pub struct Reconciler<'a> {
    base: &'a Path,
    options: ReconcileOptions,
    fs: &'a dyn FileSystem,
    sink: &'a mut dyn ActionSink,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        base: &'a Path,
        options: ReconcileOptions,
        fs: &'a dyn FileSystem,
        sink: &'a mut dyn ActionSink,
    ) -> Self {
        Self {
            base,
            options,
            fs,
            sink,
        }
    }

    /// Diffs `original` against `edited` index by index and applies each
    /// change in order.
    ///
    /// # Errors
    /// Returns [`RunError::Mismatch`] before touching the filesystem when the
    /// line counts differ, and [`RunError::DirectoryCreate`] as soon as a
    /// required parent directory cannot be created. Per-item rename and
    /// delete failures are collected in [`ReconcileReport::failures`].
    pub fn reconcile(
        &mut self,
        original: &[Entry],
        edited: &[String],
    ) -> Result<ReconcileReport, RunError> {
        ensure_same_length(original, edited)?;

        let mut report = ReconcileReport::default();
        for (entry, new) in original.iter().zip(edited) {
            match Change::classify(entry.path(), new) {
                Change::Unchanged => report.unchanged += 1,
                Change::Delete { path } => self.delete(path, &mut report),
                Change::Rename { from, to } => self.rename(from, to, &mut report)?,
            }
        }

        Ok(report)
    }

    fn delete(&mut self, path: &str, report: &mut ReconcileReport) {
        debug!("deleting `{path}`");
        match self.fs.remove(&self.resolve(path)) {
            Ok(()) => {
                report.deleted += 1;
                self.sink.record(&ActionEvent::delete(path, true));
            }
            Err(source) => {
                warn!("failed to delete `{path}`: {source}");
                self.sink.record(&ActionEvent::delete(path, false));
                report.failures.push(FileOpError {
                    op: FileOp::Delete,
                    path: path.to_string(),
                    source,
                });
            }
        }
    }

    fn rename(
        &mut self,
        from: &str,
        to: &str,
        report: &mut ReconcileReport,
    ) -> Result<(), DirectoryCreateError> {
        if self.options.make_dirs
            && let Some(parent) = parent_dir(to)
        {
            self.ensure_dir(parent, report)?;
        }

        debug!("renaming `{from}` to `{to}`");
        match self.fs.rename(&self.resolve(from), &self.resolve(to)) {
            Ok(()) => {
                report.renamed += 1;
                self.sink.record(&ActionEvent::rename(from, to, true));
                if self.options.prune_empty {
                    self.prune_empty_ancestors(from, report);
                }
            }
            Err(source) => {
                warn!("failed to rename `{from}` to `{to}`: {source}");
                self.sink.record(&ActionEvent::rename(from, to, false));
                report.failures.push(FileOpError {
                    op: FileOp::Rename,
                    path: from.to_string(),
                    source,
                });
            }
        }

        Ok(())
    }

    fn ensure_dir(
        &mut self,
        directory: &str,
        report: &mut ReconcileReport,
    ) -> Result<(), DirectoryCreateError> {
        let resolved = self.resolve(directory);
        if self.fs.exists(&resolved) {
            return Ok(());
        }

        debug!("creating directory `{directory}`");
        match self.fs.create_dir_all(&resolved) {
            Ok(()) => {
                report.created_dirs += 1;
                self.sink.record(&ActionEvent::mkdir(directory, true));

                Ok(())
            }
            Err(source) => {
                self.sink.record(&ActionEvent::mkdir(directory, false));

                Err(DirectoryCreateError {
                    path: directory.to_string(),
                    source,
                })
            }
        }
    }

    /// Removes `moved`'s ancestors while they are empty, innermost first.
    /// The base directory and anything outside it are never removed.
    ///
    /// Relies on the depth-gated listing order: every deeper entry under an
    /// ancestor has already been reconciled.
    fn prune_empty_ancestors(&mut self, moved: &str, report: &mut ReconcileReport) {
        let mut current = parent_dir(moved);
        while let Some(directory) = current {
            let resolved = self.resolve(directory);
            if !self.is_below_base(&resolved) {
                debug!("stopping prune at `{directory}`: not below the base directory");
                break;
            }

            match self.fs.is_empty_dir(&resolved) {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => {
                    debug!("stopping prune at `{directory}`: {error}");
                    break;
                }
            }

            if let Err(source) = self.fs.remove_dir(&resolved) {
                warn!("failed to remove empty directory `{directory}`: {source}");
                self.sink.record(&ActionEvent::rmdir(directory, false));
                report.failures.push(FileOpError {
                    op: FileOp::RemoveDir,
                    path: directory.to_string(),
                    source,
                });
                break;
            }

            report.removed_dirs += 1;
            self.sink.record(&ActionEvent::rmdir(directory, true));
            current = parent_dir(directory);
        }
    }

    fn resolve(&self, listing_path: &str) -> PathBuf {
        self.base.join(listing_path)
    }

    fn is_below_base(&self, path: &Path) -> bool {
        path != self.base && path.starts_with(self.base)
    }
}

/// Parent component of a listing path, `None` when nothing remains.
fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}
