#![forbid(unsafe_code)]

//! Single-line text capture for creating and renaming entries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs_ops::{create_empty_file, exists};
use crate::model::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    Create,
    Rename { path: PathBuf },
}

/// Editing keys understood by a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone)]
pub struct TextEntry {
    pub target: InputTarget,
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl TextEntry {
    pub fn create() -> Self {
        Self {
            target: InputTarget::Create,
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn rename(entry: &Entry) -> Self {
        Self {
            target: InputTarget::Rename {
                path: entry.path.clone(),
            },
            buffer: entry.name.clone(),
            cursor: entry.name.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            InputTarget::Create => "New",
            InputTarget::Rename { .. } => "Rename",
        }
    }

    pub fn label(&self) -> &'static str {
        match self.target {
            InputTarget::Create => "Name (end with / for a directory):",
            InputTarget::Rename { .. } => "New name:",
        }
    }

    pub fn edit(&mut self, key: EditKey) {
        edit_line(&mut self.buffer, &mut self.cursor, key);
    }
}

/// Applies one editing key to `buffer`, keeping `cursor` (in characters)
/// within bounds.
pub fn edit_line(buffer: &mut String, cursor: &mut usize, key: EditKey) {
    let len = buffer.chars().count();
    *cursor = (*cursor).min(len);
    match key {
        EditKey::Insert(ch) => {
            buffer.insert(byte_index(buffer, *cursor), ch);
            *cursor += 1;
        }
        EditKey::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                buffer.remove(byte_index(buffer, *cursor));
            }
        }
        EditKey::Delete => {
            if *cursor < len {
                buffer.remove(byte_index(buffer, *cursor));
            }
        }
        EditKey::Left => *cursor = cursor.saturating_sub(1),
        EditKey::Right => *cursor = (*cursor + 1).min(len),
        EditKey::Home => *cursor = 0,
        EditKey::End => *cursor = len,
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Applies a finished buffer to the filesystem. Returns the path that was
/// created or renamed to, or `None` for an empty buffer.
pub fn commit(target: &InputTarget, buffer: &str, cwd: &Path) -> Result<Option<PathBuf>> {
    let name = buffer.trim();
    if name.is_empty() {
        return Ok(None);
    }
    // A leading `/` is dropped so the name joins onto `cwd`; `..` components
    // still climb out of it.
    let relative = name.trim_start_matches('/');
    if relative.is_empty() {
        return Ok(None);
    }
    let path = cwd.join(relative);
    match target {
        InputTarget::Create => create(&path, name.ends_with('/')).map(Some),
        InputTarget::Rename { path: src } => rename(src, &path).map(Some),
    }
}

fn create(path: &Path, as_dir: bool) -> Result<PathBuf> {
    if as_dir {
        fs::create_dir_all(path).map_err(|err| Error::io("mkdir", path, err))?;
        return Ok(path.to_path_buf());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| Error::io("mkdir", parent, err))?;
    }
    match create_empty_file(path) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            Err(Error::AlreadyExists(path.to_path_buf()))
        }
        Err(err) => Err(Error::io("create", path, err)),
    }
}

/// Refuses to replace an existing destination.
fn rename(src: &Path, dst: &Path) -> Result<PathBuf> {
    if src == dst {
        return Ok(dst.to_path_buf());
    }
    if exists(dst) {
        return Err(Error::AlreadyExists(dst.to_path_buf()));
    }
    fs::rename(src, dst).map_err(|err| Error::io("rename", src, err))?;
    Ok(dst.to_path_buf())
}
