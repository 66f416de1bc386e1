#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

use crate::fs_ops::is_hidden;
use crate::model::Entry;

/// Lists the direct children of `dir`: a `..` link first (unless `dir` is
/// the root), then directories, then everything else. Both groups keep
/// name order.
pub fn list(dir: &Path, show_hidden: bool) -> io::Result<Vec<Entry>> {
    let mut items = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .collect::<Vec<_>>();
    items.sort_by_key(|item| item.file_name());

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for item in items {
        let name = item.file_name().to_string_lossy().to_string();
        if !show_hidden && is_hidden(&name) {
            continue;
        }
        let path = item.path();
        // Follow symlinks, but still list dangling ones as plain files.
        let Ok(metadata) = fs::metadata(&path).or_else(|_| item.metadata()) else {
            continue;
        };
        let entry = Entry {
            name,
            path,
            is_dir: metadata.is_dir(),
            is_parent_link: false,
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
        };
        if entry.is_dir {
            dirs.push(entry);
        } else {
            files.push(entry);
        }
    }

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent().filter(|parent| *parent != dir) {
        entries.push(Entry::parent_link(parent));
    }
    entries.extend(dirs);
    entries.extend(files);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "bee").unwrap();
        fs::write(temp.path().join("a.txt"), "ay").unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();
        fs::write(temp.path().join(".cfg"), "hidden").unwrap();
        temp
    }

    #[test]
    fn directories_first_hidden_filtered() {
        let temp = sample_dir();
        let entries = list(temp.path(), false).unwrap();
        assert_eq!(names(&entries), ["..", "d", "a.txt", "b.txt"]);

        let parent = &entries[0];
        assert!(parent.is_parent_link);
        assert!(parent.is_dir);
        assert_eq!(parent.path, temp.path().parent().unwrap());
        assert_eq!(entries[2].path, temp.path().join("a.txt"));
        assert_eq!(entries[2].size, 2);
    }

    #[test]
    fn toggling_hidden_only_adds_dot_entries() {
        let temp = sample_dir();
        let hidden_off = list(temp.path(), false).unwrap();
        let hidden_on = list(temp.path(), true).unwrap();

        assert_eq!(names(&hidden_on), ["..", "d", ".cfg", "a.txt", "b.txt"]);
        let without_dots: Vec<_> = names(&hidden_on)
            .into_iter()
            .filter(|name| *name == ".." || !name.starts_with('.'))
            .collect();
        assert_eq!(without_dots, names(&hidden_off));
    }

    #[test]
    fn root_has_no_parent_link() {
        let entries = list(Path::new("/"), true).unwrap();
        assert!(entries.iter().all(|e| !e.is_parent_link));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(list(&temp.path().join("nope"), false).is_err());
    }
}
