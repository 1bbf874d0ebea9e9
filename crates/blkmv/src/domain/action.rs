/// Kind of filesystem mutation reported to an [`ActionSink`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionKind {
    Delete,
    Rename,
    Mkdir,
    Rmdir,
}

/// One action taken by the reconciler, successful or not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionEvent {
    pub kind: ActionKind,
    /// Listing path (or directory path) the action applies to.
    pub source: String,
    /// Destination, set for renames only.
    pub target: Option<String>,
    pub success: bool,
}

impl ActionEvent {
    pub fn delete(source: impl Into<String>, success: bool) -> Self {
        Self {
            kind: ActionKind::Delete,
            source: source.into(),
            target: None,
            success,
        }
    }

    pub fn rename(source: impl Into<String>, target: impl Into<String>, success: bool) -> Self {
        Self {
            kind: ActionKind::Rename,
            source: source.into(),
            target: Some(target.into()),
            success,
        }
    }

    pub fn mkdir(directory: impl Into<String>, success: bool) -> Self {
        Self {
            kind: ActionKind::Mkdir,
            source: directory.into(),
            target: None,
            success,
        }
    }

    pub fn rmdir(directory: impl Into<String>, success: bool) -> Self {
        Self {
            kind: ActionKind::Rmdir,
            source: directory.into(),
            target: None,
            success,
        }
    }
}

/// Receives one structured event per action the reconciler takes.
#[cfg_attr(test, mockall::automock)]
pub trait ActionSink {
    fn record(&mut self, event: &ActionEvent);
}

/// Collects events in order.
impl ActionSink for Vec<ActionEvent> {
    fn record(&mut self, event: &ActionEvent) {
        self.push(event.clone());
    }
}
