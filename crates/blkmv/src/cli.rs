//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

use crate::app::pipeline::RunConfig;
use crate::app::reconcile::ReconcileOptions;
use crate::domain::ordering::{Direction, OrderingMode, SortMode};
use crate::infra::discovery::{DiscoveryConfig, Select};
use crate::infra::editor::resolve_editor_command;

/// Rename or delete files in bulk by editing their names in your editor.
///
/// Change a line to rename that entry, start it with `#` to delete it, and
/// leave it alone to keep it. Adding or removing lines aborts the run.
#[derive(Debug, Parser)]
#[command(name = "blkmv", version)]
pub struct Cli {
    /// Directory whose entries are listed.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Include hidden entries.
    #[arg(short = 'a', long = "hidden")]
    pub hidden: bool,

    /// Create missing parent directories of rename targets.
    #[arg(short = 'm', long = "mkdir")]
    pub make_dirs: bool,

    /// Remove directories left empty by a move.
    #[arg(short = 'e', long)]
    pub prune_empty: bool,

    /// Walk subdirectories.
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// List absolute paths.
    #[arg(short = 'f', long)]
    pub full_path: bool,

    /// List directories instead of regular files.
    #[arg(short = 'd', long = "dirs")]
    pub dirs: bool,

    /// Skip entries matched by `.gitignore` and `.ignore` files.
    #[arg(long)]
    pub git_ignore: bool,

    /// Listing order: name, size, mtime, type, or type:<name|size|mtime>.
    #[arg(short = 's', long, value_name = "MODE", default_value_t = SortMode::Name)]
    pub sort: SortMode,

    /// Reverse the listing order (deeper entries still come first).
    #[arg(short = 'r', long)]
    pub reverse: bool,

    /// Editor command, overriding `$VISUAL` and `$EDITOR`.
    #[arg(long, value_name = "CMD")]
    pub editor: Option<String>,

    /// Log more; repeat for debug output.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the immutable run configuration from the parsed flags.
    pub fn run_config(&self) -> RunConfig {
        let direction = if self.reverse {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        let select = if self.dirs {
            Select::Directories
        } else {
            Select::Files
        };

        RunConfig {
            root: self.dir.clone(),
            discovery: DiscoveryConfig {
                include_hidden: self.hidden,
                recursive: self.recursive,
                select,
                full_path: self.full_path,
                respect_ignore: self.git_ignore,
                ordering: OrderingMode::new(self.sort, direction),
            },
            reconcile: ReconcileOptions {
                make_dirs: self.make_dirs,
                prune_empty: self.prune_empty,
            },
        }
    }

    pub fn editor_command(&self) -> String {
        resolve_editor_command(self.editor.as_deref())
    }

    /// Maps `-v` occurrences to the diagnostic log level.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}
