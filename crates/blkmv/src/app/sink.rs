//! Human-readable rendering of reconciliation events.

use std::borrow::Cow;
use std::io::Write;

use tracing::warn;

use crate::domain::action::{ActionEvent, ActionKind, ActionSink};

const FAILED_PREFIX: &str = "# failed: ";

/// Writes each event as the shell command it corresponds to.
///
/// Successful actions read like `mv 'old name' new`; failed ones are
/// commented out with a `# failed: ` prefix so the output stays
/// copy-pasteable.
pub struct ShellSink<W: Write> {
    writer: W,
}

impl<W: Write> ShellSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ActionSink for ShellSink<W> {
    fn record(&mut self, event: &ActionEvent) {
        let line = render_event(event);
        if let Err(error) = writeln!(self.writer, "{line}") {
            warn!("failed to write action log: {error}");
        }
    }
}

/// Renders one event as a shell-quoted command line.
pub fn render_event(event: &ActionEvent) -> String {
    let source = quote(&event.source);
    let command = match event.kind {
        ActionKind::Rename => {
            let target = quote(event.target.as_deref().unwrap_or_default());
            format!("mv {source} {target}")
        }
        ActionKind::Delete => format!("rm {source}"),
        ActionKind::Mkdir => format!("mkdir -p {source}"),
        ActionKind::Rmdir => format!("rmdir {source}"),
    };

    if event.success {
        command
    } else {
        format!("{FAILED_PREFIX}{command}")
    }
}

fn quote(word: &str) -> Cow<'_, str> {
    shlex::try_quote(word).unwrap_or_else(|_| Cow::Owned(format!("{word:?}")))
}
