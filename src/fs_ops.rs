#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub fn copy_entry(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        copy_dir_recursive(src, dest)
    } else {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dest)?;
        Ok(())
    }
}

pub fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    if !dest.exists() {
        fs::create_dir_all(dest)?;
    }
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_dir_recursive(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }
    Ok(())
}

/// Renames `src` to `dest`, copying and then deleting the source when the
/// two sit on different filesystems.
pub fn move_entry(src: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            copy_entry(src, dest)?;
            remove_path(src)
        }
        Err(err) => Err(err),
    }
}

/// Removes a file, symlink, or whole directory tree. Symlinks are never
/// followed.
pub fn remove_path(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Creates an empty file, failing with `AlreadyExists` instead of truncating.
pub fn create_empty_file(path: &Path) -> io::Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

pub fn format_time(time: Option<SystemTime>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    let Ok(format) = time::format_description::parse("[day]-[month]-[year repr:last_two] [hour]:[minute]")
    else {
        return String::new();
    };
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    time::OffsetDateTime::from(time)
        .to_offset(offset)
        .format(&format)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copy_dir_recursive_copies_nested_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();
        fs::write(src.join("inner/deep.txt"), "deep").unwrap();

        let dest = temp.path().join("dest");
        copy_entry(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "top");
        assert_eq!(fs::read_to_string(dest.join("inner/deep.txt")).unwrap(), "deep");
        assert!(src.join("inner/deep.txt").exists());
    }

    #[test]
    fn move_entry_renames_within_filesystem() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, "payload").unwrap();
        let dest = temp.path().join("b.txt");

        move_entry(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "payload");
    }

    #[test]
    fn remove_path_handles_files_and_trees() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, "x").unwrap();
        let dir = temp.path().join("d");
        fs::create_dir_all(dir.join("e")).unwrap();
        fs::write(dir.join("e/g"), "y").unwrap();

        remove_path(&file).unwrap();
        remove_path(&dir).unwrap();

        assert!(!exists(&file));
        assert!(!exists(&dir));
        assert!(remove_path(&file).is_err());
    }

    #[test]
    fn create_empty_file_never_truncates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("keep.txt");
        fs::write(&path, "content").unwrap();

        let err = create_empty_file(&path).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn human_size_formatting() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(1_572_864), "1.5 MB");
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(".cfg"));
        assert!(!is_hidden("cfg"));
    }
}
