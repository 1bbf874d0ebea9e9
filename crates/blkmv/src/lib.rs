//! Bulk rename and delete by editing a plain-text listing.
//!
//! A run discovers entries below a directory, writes them one per line to a
//! temporary file, waits for an external editor, and reconciles the edited
//! lines back into renames, deletions, and directory housekeeping.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;

pub use app::pipeline::{Pipeline, RunConfig, RunOutcome, RunState};
pub use error::RunError;
