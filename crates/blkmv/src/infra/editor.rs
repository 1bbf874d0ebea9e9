//! External editor boundary.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::EditorError;

/// Editor used when neither `$VISUAL` nor `$EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vi";

/// Blocking editor collaborator.
///
/// Implementations return only after the user is done editing `path`.
#[cfg_attr(test, mockall::automock)]
pub trait Editor {
    /// Opens `path` and waits for the editor to exit.
    ///
    /// # Errors
    /// Returns [`EditorError::Aborted`] for a nonzero exit status, or a
    /// spawn error when the editor cannot be started.
    fn edit(&self, path: &Path) -> Result<(), EditorError>;
}

/// Editor launched as a child process, with the listing path appended as
/// its final argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandEditor {
    program: String,
    args: Vec<String>,
}

impl CommandEditor {
    /// Splits `command` with shell-word rules, e.g. `code --wait`.
    ///
    /// # Errors
    /// Returns [`EditorError::NoEditor`] for a blank command and
    /// [`EditorError::InvalidCommand`] for unbalanced quoting.
    pub fn from_command(command: &str) -> Result<Self, EditorError> {
        let words =
            shlex::split(command).ok_or_else(|| EditorError::InvalidCommand(command.to_string()))?;
        let Some((program, args)) = words.split_first() else {
            return Err(EditorError::NoEditor);
        };

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<(), EditorError> {
        debug!("launching `{}` on `{}`", self.program, path.display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|source| {
                if source.kind() == ErrorKind::NotFound {
                    EditorError::NotFound(self.program.clone())
                } else {
                    EditorError::Spawn {
                        command: self.program.clone(),
                        source,
                    }
                }
            })?;

        if !status.success() {
            return Err(EditorError::Aborted(status));
        }

        Ok(())
    }
}

/// Resolves the editor command: explicit choice, then `$VISUAL`, then
/// `$EDITOR`, then [`DEFAULT_EDITOR`].
pub fn resolve_editor_command(explicit: Option<&str>) -> String {
    editor_command_from(explicit, |name| std::env::var(name).ok())
}

fn editor_command_from(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    if let Some(explicit) = explicit.filter(|command| !command.trim().is_empty()) {
        return explicit.to_string();
    }

    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(lookup)
        .find(|command| !command.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}
