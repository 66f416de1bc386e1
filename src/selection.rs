#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::fs_ops::exists;
use crate::model::Entry;

/// Absolute paths the user has marked. Survives directory changes so marks
/// can be collected from several directories before a yank or cut.
#[derive(Debug, Default)]
pub struct SelectionSet {
    paths: BTreeSet<PathBuf>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `entry` and returns whether it is now marked.
    /// Parent links are never marked.
    pub fn toggle(&mut self, entry: &Entry) -> bool {
        if entry.is_parent_link {
            return false;
        }
        if self.paths.remove(&entry.path) {
            false
        } else {
            self.paths.insert(entry.path.clone());
            true
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        self.paths.remove(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Empties the set, returning its members in path order.
    pub fn take(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths).into_iter().collect()
    }

    /// Drops marks whose files have disappeared.
    pub fn prune_missing(&mut self) {
        self.paths.retain(|path| exists(path));
    }
}
