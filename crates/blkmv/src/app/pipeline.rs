//! One bulk-edit run: discover, list, edit, parse, reconcile.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::app::reconcile::{ReconcileOptions, ReconcileReport, Reconciler};
use crate::domain::action::ActionSink;
use crate::error::RunError;
use crate::infra::discovery::{DiscoveryConfig, discover, listing_base};
use crate::infra::editor::Editor;
use crate::infra::fs::FileSystem;
use crate::infra::listing::{ListingFile, ensure_same_length, parse, render};

/// Immutable configuration for one run.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// Directory whose entries are listed; listing paths resolve against it.
    pub root: PathBuf,
    pub discovery: DiscoveryConfig,
    pub reconcile: ReconcileOptions,
}

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    #[default]
    Idle,
    Discovering,
    Listed,
    AwaitingEdit,
    Parsed,
    Reconciling,
    Done,
    Failed,
}

/// How a run that did not fail ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Discovery found no entries; the editor was not started.
    NothingToDo,
    Completed(ReconcileReport),
}

/// Drives the stages of one run strictly in sequence.
pub struct Pipeline<'a> {
    config: &'a RunConfig,
    editor: &'a dyn Editor,
    fs: &'a dyn FileSystem,
    state: RunState,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a RunConfig, editor: &'a dyn Editor, fs: &'a dyn FileSystem) -> Self {
        Self {
            config,
            editor,
            fs,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs every stage, reporting each action to `sink`.
    ///
    /// The temporary listing is removed before this returns, on every path.
    ///
    /// # Errors
    /// Returns [`RunError`] for discovery failures, editor aborts, unreadable
    /// or mismatched listings (all before any mutation), and for a parent
    /// directory that cannot be created mid-reconciliation.
    pub fn run(&mut self, sink: &mut dyn ActionSink) -> Result<RunOutcome, RunError> {
        let result = self.run_stages(sink);
        if result.is_err() {
            self.transition(RunState::Failed);
        }

        result
    }

    fn run_stages(&mut self, sink: &mut dyn ActionSink) -> Result<RunOutcome, RunError> {
        self.transition(RunState::Discovering);
        let base = listing_base(&self.config.root, &self.config.discovery)?;
        let entries = discover(&self.config.root, &self.config.discovery)?;
        if entries.is_empty() {
            self.transition(RunState::Done);

            return Ok(RunOutcome::NothingToDo);
        }

        let listing_file = ListingFile::create(&render(&entries))?;
        self.transition(RunState::Listed);

        self.transition(RunState::AwaitingEdit);
        self.editor.edit(listing_file.path())?;
        let edited = parse(&listing_file.read_back()?)?;
        drop(listing_file);
        self.transition(RunState::Parsed);

        ensure_same_length(&entries, &edited)?;

        self.transition(RunState::Reconciling);
        let report = Reconciler::new(&base, self.config.reconcile, self.fs, sink)
            .reconcile(&entries, &edited)?;
        info!(
            "renamed {}, deleted {}, created {} and removed {} directories, {} failed",
            report.renamed,
            report.deleted,
            report.created_dirs,
            report.removed_dirs,
            report.failures.len()
        );
        self.transition(RunState::Done);

        Ok(RunOutcome::Completed(report))
    }

    fn transition(&mut self, next: RunState) {
        debug!("run state {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;

    use super::*;
    use crate::domain::action::ActionEvent;
    use crate::error::{EditorError, ListingError};
    use crate::infra::discovery::Select;
    use crate::infra::editor::MockEditor;
    use crate::infra::fs::{MockFileSystem, RealFileSystem};

    fn config(root: &Path) -> RunConfig {
        RunConfig {
            root: root.to_path_buf(),
            ..RunConfig::default()
        }
    }

    /// Editor double that replaces the listing with `content` and remembers
    /// what it was shown.
    fn rewriting_editor(content: &str, shown: Arc<Mutex<String>>) -> MockEditor {
        let content = content.to_string();
        let mut editor = MockEditor::new();
        editor.expect_edit().times(1).returning(move |path| {
            let original = fs::read_to_string(path).unwrap_or_default();
            if let Ok(mut shown) = shown.lock() {
                *shown = original;
            }
            fs::write(path, &content).map_err(|source| EditorError::Spawn {
                command: "test".to_string(),
                source,
            })
        });

        editor
    }

    #[test]
    fn test_run_empty_directory_skips_editor() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        let config = config(temp_dir.path());
        let mut editor = MockEditor::new();
        editor.expect_edit().never();
        let file_system = MockFileSystem::new();
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &file_system);

        // Act
        let outcome = pipeline
            .run(&mut events)
            .expect("test expectation should hold");

        // Assert
        assert!(matches!(outcome, RunOutcome::NothingToDo));
        assert_eq!(pipeline.state(), RunState::Done);
    }

    #[test]
    fn test_run_lists_sorted_entries_and_applies_edits() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::write(temp_dir.path().join("b.txt"), "b").expect("test expectation should hold");
        fs::write(temp_dir.path().join("a.txt"), "a").expect("test expectation should hold");
        let mut config = config(temp_dir.path());
        config.reconcile.make_dirs = true;
        let shown = Arc::new(Mutex::new(String::new()));
        let editor = rewriting_editor("a.txt\nz/renamed.txt\n", Arc::clone(&shown));
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &RealFileSystem);

        // Act
        let outcome = pipeline
            .run(&mut events)
            .expect("test expectation should hold");

        // Assert
        assert_eq!(
            *shown.lock().expect("test expectation should hold"),
            "a.txt\nb.txt\n"
        );
        let RunOutcome::Completed(report) = outcome else {
            unreachable!("entries were discovered");
        };
        assert_eq!(report.renamed, 1);
        assert_eq!(
            events,
            vec![
                ActionEvent::mkdir("z", true),
                ActionEvent::rename("b.txt", "z/renamed.txt", true),
            ]
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("z/renamed.txt"))
                .expect("test expectation should hold"),
            "b"
        );
        assert_eq!(pipeline.state(), RunState::Done);
    }

    #[test]
    fn test_run_editor_abort_discards_listing_without_mutation() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::write(temp_dir.path().join("a.txt"), "").expect("test expectation should hold");
        let config = config(temp_dir.path());
        let listing_path = Arc::new(Mutex::new(None));
        let seen_path = Arc::clone(&listing_path);
        let mut editor = MockEditor::new();
        editor.expect_edit().times(1).returning(move |path| {
            if let Ok(mut seen) = seen_path.lock() {
                *seen = Some(path.to_path_buf());
            }
            fs::write(path, "#a.txt\n").ok();

            Err(EditorError::NoEditor)
        });
        let file_system = MockFileSystem::new();
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &file_system);

        // Act
        let result = pipeline.run(&mut events);

        // Assert
        assert!(matches!(result, Err(RunError::Editor(_))));
        assert_eq!(pipeline.state(), RunState::Failed);
        assert!(events.is_empty());
        let listing_path = listing_path
            .lock()
            .expect("test expectation should hold")
            .clone()
            .expect("test expectation should hold");
        assert!(!listing_path.exists());
    }

    #[test]
    fn test_run_line_count_change_aborts_without_mutation() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::write(temp_dir.path().join("a.txt"), "").expect("test expectation should hold");
        fs::write(temp_dir.path().join("b.txt"), "").expect("test expectation should hold");
        let config = config(temp_dir.path());
        let editor = rewriting_editor("#a.txt\n", Arc::new(Mutex::new(String::new())));
        let file_system = MockFileSystem::new();
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &file_system);

        // Act
        let result = pipeline.run(&mut events);

        // Assert
        assert!(matches!(result, Err(RunError::Mismatch(_))));
        assert_eq!(pipeline.state(), RunState::Failed);
        assert!(events.is_empty());
    }

    #[test]
    fn test_run_unterminated_listing_aborts_without_mutation() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::write(temp_dir.path().join("a.txt"), "").expect("test expectation should hold");
        let config = config(temp_dir.path());
        let editor = rewriting_editor("b.txt", Arc::new(Mutex::new(String::new())));
        let file_system = MockFileSystem::new();
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &file_system);

        // Act
        let result = pipeline.run(&mut events);

        // Assert
        assert!(matches!(
            result,
            Err(RunError::Listing(ListingError::Unterminated))
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_run_recursive_prune_moves_and_cleans_up() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::create_dir_all(temp_dir.path().join("a/b")).expect("test expectation should hold");
        fs::write(temp_dir.path().join("a/b/only.txt"), "").expect("test expectation should hold");
        fs::write(temp_dir.path().join("a/x.txt"), "").expect("test expectation should hold");
        let mut config = config(temp_dir.path());
        config.discovery.recursive = true;
        config.reconcile.prune_empty = true;
        let shown = Arc::new(Mutex::new(String::new()));
        let editor = rewriting_editor("a/moved.txt\na/x.txt\n", Arc::clone(&shown));
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &RealFileSystem);

        // Act
        pipeline
            .run(&mut events)
            .expect("test expectation should hold");

        // Assert
        assert_eq!(
            *shown.lock().expect("test expectation should hold"),
            "a/b/only.txt\na/x.txt\n"
        );
        assert!(!temp_dir.path().join("a/b").exists());
        assert!(temp_dir.path().join("a/moved.txt").is_file());
        assert!(temp_dir.path().join("a/x.txt").is_file());
    }

    #[test]
    fn test_run_full_path_prune_keeps_listed_directory() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        let outer = fs::canonicalize(temp_dir.path()).expect("test expectation should hold");
        let root = outer.join("project");
        fs::create_dir_all(root.join("sub")).expect("test expectation should hold");
        fs::write(root.join("sub/only.txt"), "").expect("test expectation should hold");
        let mut config = config(&root);
        config.discovery.full_path = true;
        config.discovery.recursive = true;
        config.reconcile.prune_empty = true;
        let edited = format!("{}\n", outer.join("moved.txt").display());
        let editor = rewriting_editor(&edited, Arc::new(Mutex::new(String::new())));
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &RealFileSystem);

        // Act
        pipeline
            .run(&mut events)
            .expect("test expectation should hold");

        // Assert
        assert!(root.is_dir());
        assert!(!root.join("sub").exists());
        assert!(outer.join("moved.txt").is_file());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_run_directory_mode_renames_directories() {
        // Arrange
        let temp_dir = TempDir::new().expect("test expectation should hold");
        fs::create_dir_all(temp_dir.path().join("photos")).expect("test expectation should hold");
        fs::write(temp_dir.path().join("photos/a.jpg"), "").expect("test expectation should hold");
        let mut config = config(temp_dir.path());
        config.discovery.select = Select::Directories;
        let editor = rewriting_editor("pictures\n", Arc::new(Mutex::new(String::new())));
        let mut events = Vec::new();
        let mut pipeline = Pipeline::new(&config, &editor, &RealFileSystem);

        // Act
        pipeline
            .run(&mut events)
            .expect("test expectation should hold");

        // Assert
        assert!(temp_dir.path().join("pictures/a.jpg").is_file());
        assert!(!temp_dir.path().join("photos").exists());
    }
}
