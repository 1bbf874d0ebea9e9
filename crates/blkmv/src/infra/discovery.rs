//! Directory walk that produces the ordered entry sequence.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};
use tracing::{debug, warn};

use crate::domain::entry::{Entry, SortKey};
use crate::domain::ordering::{KeyKind, OrderingMode};
use crate::error::DiscoveryError;

/// Which kind of filesystem object becomes an [`Entry`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Select {
    #[default]
    Files,
    Directories,
}

/// Walk settings for one run.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryConfig {
    pub include_hidden: bool,
    pub recursive: bool,
    pub select: Select,
    /// Lists absolute paths instead of paths relative to the root.
    pub full_path: bool,
    /// Honors `.gitignore` and `.ignore` rules below the root.
    pub respect_ignore: bool,
    pub ordering: OrderingMode,
}

/// Walks `root` and returns its entries sorted depth-first by `config`'s
/// ordering.
///
/// # Errors
/// Returns [`DiscoveryError`] as soon as any directory along the walk cannot
/// be opened or a required metadata lookup fails; no partial list is
/// returned.
pub fn discover(root: &Path, config: &DiscoveryConfig) -> Result<Vec<Entry>, DiscoveryError> {
    let base = listing_base(root, config)?;

    let walker = WalkBuilder::new(&base)
        .standard_filters(false)
        .hidden(!config.include_hidden)
        .git_ignore(config.respect_ignore)
        .git_exclude(config.respect_ignore)
        .ignore(config.respect_ignore)
        .require_git(false)
        .follow_links(false)
        .max_depth(if config.recursive { None } else { Some(1) })
        .build();

    let key_kind = config.ordering.mode.key_kind();
    let mut entries = Vec::new();
    for result in walker {
        let dir_entry = result?;
        if dir_entry.depth() == 0 || !is_selected(&dir_entry, config.select) {
            continue;
        }

        let Some(path) = listing_path(&base, dir_entry.path(), config.full_path) else {
            warn!(
                "skipping `{}`: name is not valid UTF-8",
                dir_entry.path().display()
            );
            continue;
        };

        let sort_key = sort_key_for(&dir_entry, key_kind)?;
        entries.push(Entry::with_sort_key(path, sort_key));
    }

    entries.sort_by(|left, right| config.ordering.compare_depth_gated(left, right));
    debug!("discovered {} entries under `{}`", entries.len(), base.display());

    Ok(entries)
}

/// Directory that listing paths are relative to, canonicalized when
/// `config` lists absolute paths.
///
/// # Errors
/// Returns [`DiscoveryError::Root`] when the root cannot be canonicalized.
pub fn listing_base(root: &Path, config: &DiscoveryConfig) -> Result<PathBuf, DiscoveryError> {
    if !config.full_path {
        return Ok(root.to_path_buf());
    }

    fs::canonicalize(root).map_err(|source| DiscoveryError::Root {
        path: root.to_path_buf(),
        source,
    })
}

fn is_selected(dir_entry: &DirEntry, select: Select) -> bool {
    dir_entry
        .file_type()
        .is_some_and(|file_type| match select {
            Select::Files => file_type.is_file(),
            Select::Directories => file_type.is_dir(),
        })
}

/// Renders `path` as a `/`-joined listing path.
fn listing_path(base: &Path, path: &Path, full_path: bool) -> Option<String> {
    let path = if full_path {
        path
    } else {
        path.strip_prefix(base).ok()?
    };
    let path = path.to_str()?;

    if cfg!(windows) {
        return Some(path.replace('\\', "/"));
    }

    Some(path.to_string())
}

/// Fetches only the metadata `key_kind` needs.
fn sort_key_for(dir_entry: &DirEntry, key_kind: KeyKind) -> Result<SortKey, DiscoveryError> {
    match key_kind {
        KeyKind::Name => Ok(SortKey::Name),
        KeyKind::Size => Ok(SortKey::Size(dir_entry.metadata()?.len())),
        KeyKind::ModTime => {
            let modified = dir_entry
                .metadata()?
                .modified()
                .map_err(|source| DiscoveryError::Metadata {
                    path: PathBuf::from(dir_entry.path()),
                    source,
                })?;

            Ok(SortKey::ModTime(modified))
        }
    }
}
