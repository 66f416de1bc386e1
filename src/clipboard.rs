#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fs_ops::{copy_entry, move_entry};
use crate::model::ClipboardMode;

/// Paths captured by the last yank or cut, replayed by the next paste.
#[derive(Debug, Default)]
pub struct Clipboard {
    mode: ClipboardMode,
    paths: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct PasteReport {
    pub mode: ClipboardMode,
    pub pasted: Vec<PathBuf>,
    pub failed: Vec<Error>,
}

impl PasteReport {
    pub fn summary(&self) -> String {
        let verb = match self.mode {
            ClipboardMode::Cut => "Moved",
            _ => "Copied",
        };
        match self.failed.first() {
            None => format!("{verb} {} item(s)", self.pasted.len()),
            Some(first) => format!(
                "{verb} {} item(s), {} failed: {first}",
                self.pasted.len(),
                self.failed.len()
            ),
        }
    }
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn yank(&mut self, paths: Vec<PathBuf>) {
        self.fill(ClipboardMode::Copy, paths);
    }

    pub fn cut(&mut self, paths: Vec<PathBuf>) {
        self.fill(ClipboardMode::Cut, paths);
    }

    fn fill(&mut self, mode: ClipboardMode, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            self.clear();
            return;
        }
        self.mode = mode;
        self.paths = paths;
    }

    pub fn clear(&mut self) {
        self.mode = ClipboardMode::None;
        self.paths.clear();
    }

    /// Copies or moves every captured path into `dest_dir` under its base
    /// name. The clipboard is empty afterwards whatever the per-item outcome.
    pub fn paste(&mut self, dest_dir: &Path) -> PasteReport {
        let mode = std::mem::take(&mut self.mode);
        let paths = std::mem::take(&mut self.paths);
        let mut report = PasteReport {
            mode,
            pasted: Vec::new(),
            failed: Vec::new(),
        };
        if mode == ClipboardMode::None {
            return report;
        }
        for src in &paths {
            match paste_one(mode, src, dest_dir) {
                Ok(dst) => {
                    info!(src = %src.display(), dst = %dst.display(), ?mode, "pasted");
                    report.pasted.push(dst);
                }
                Err(err) => {
                    warn!(src = %src.display(), "paste failed: {err}");
                    report.failed.push(err);
                }
            }
        }
        report
    }
}

fn paste_one(mode: ClipboardMode, src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let Some(name) = src.file_name() else {
        return Err(Error::io("paste", src, io::Error::from(io::ErrorKind::InvalidInput)));
    };
    let dst = dest_dir.join(name);
    if src.is_dir() && resolves_inside(dest_dir, src) {
        return Err(Error::IntoItself(src.to_path_buf()));
    }
    let onto_itself = dst == src || same_file(src, &dst);
    match mode {
        ClipboardMode::Copy => {
            if onto_itself {
                return Err(Error::SamePath(dst));
            }
            copy_entry(src, &dst).map_err(|err| Error::io("copy", src, err))?;
        }
        ClipboardMode::Cut => {
            if !onto_itself {
                move_entry(src, &dst).map_err(|err| Error::io("move", src, err))?;
            }
        }
        ClipboardMode::None => {}
    }
    Ok(dst)
}

/// Whether both paths name the same file once symlinks are followed.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

/// Whether `dir` is `root` or lies below it after resolving symlinks.
fn resolves_inside(dir: &Path, root: &Path) -> bool {
    let resolve = |path: &Path| fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    resolve(dir).starts_with(resolve(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        fs::write(&src, b"alpha bytes").unwrap();
        let dest = temp.path().join("d");
        fs::create_dir(&dest).unwrap();
        (temp, src, dest)
    }

    #[test]
    fn yank_then_paste_copies_bytes() {
        let (_temp, src, dest) = setup();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![src.clone()]);
        assert_eq!(clipboard.mode(), ClipboardMode::Copy);

        let report = clipboard.paste(&dest);

        assert_eq!(report.pasted, [dest.join("a.txt")]);
        assert!(report.failed.is_empty());
        assert_eq!(fs::read(&src).unwrap(), b"alpha bytes");
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"alpha bytes");
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.mode(), ClipboardMode::None);
    }

    #[test]
    fn cut_then_paste_moves() {
        let (_temp, src, dest) = setup();
        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![src.clone()]);

        let report = clipboard.paste(&dest);

        assert_eq!(report.summary(), "Moved 1 item(s)");
        assert!(!src.exists());
        assert_eq!(fs::read(dest.join("a.txt")).unwrap(), b"alpha bytes");
    }

    #[test]
    fn paste_clears_even_when_items_fail() {
        let (temp, src, dest) = setup();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![temp.path().join("missing"), src]);

        let report = clipboard.paste(&dest);

        assert_eq!(report.pasted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.summary().starts_with("Copied 1 item(s), 1 failed: copy "));
        assert!(clipboard.is_empty());
    }

    #[test]
    fn copy_onto_itself_is_rejected() {
        let (temp, src, _dest) = setup();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![src.clone()]);

        let report = clipboard.paste(temp.path());

        assert!(matches!(report.failed.as_slice(), [Error::SamePath(_)]));
        assert_eq!(fs::read(&src).unwrap(), b"alpha bytes");
    }

    #[test]
    fn directory_cannot_be_pasted_inside_itself() {
        let (_temp, _src, dest) = setup();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![dest.clone()]);

        let report = clipboard.paste(&dest);

        assert!(matches!(report.failed.as_slice(), [Error::IntoItself(_)]));
        assert!(!dest.join("d").exists());
    }

    #[test]
    fn directories_are_copied_recursively() {
        let (temp, _src, dest) = setup();
        let tree = temp.path().join("tree");
        fs::create_dir_all(tree.join("leaf")).unwrap();
        fs::write(tree.join("leaf/x"), "x").unwrap();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![tree.clone()]);

        let report = clipboard.paste(&dest);

        assert!(report.failed.is_empty());
        assert_eq!(fs::read_to_string(dest.join("tree/leaf/x")).unwrap(), "x");
        assert!(tree.join("leaf/x").exists());
    }

    #[test]
    fn empty_yank_leaves_clipboard_empty() {
        let mut clipboard = Clipboard::new();
        clipboard.yank(Vec::new());
        assert_eq!(clipboard.mode(), ClipboardMode::None);
        assert!(clipboard.paths().is_empty());
    }

    #[test]
    fn copy_through_symlinked_directory_keeps_source() {
        let (temp, src, _dest) = setup();
        let alias = temp.path().join("alias");
        symlink(temp.path(), &alias).unwrap();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![src.clone()]);

        let report = clipboard.paste(&alias);

        assert!(matches!(report.failed.as_slice(), [Error::SamePath(_)]));
        assert!(report.pasted.is_empty());
        assert_eq!(fs::read(&src).unwrap(), b"alpha bytes");
    }

    #[test]
    fn cut_through_symlinked_directory_is_a_no_op() {
        let (temp, src, _dest) = setup();
        let alias = temp.path().join("alias");
        symlink(temp.path(), &alias).unwrap();
        let mut clipboard = Clipboard::new();
        clipboard.cut(vec![src.clone()]);

        let report = clipboard.paste(&alias);

        assert!(report.failed.is_empty());
        assert_eq!(fs::read(&src).unwrap(), b"alpha bytes");
    }

    #[test]
    fn directory_cannot_be_pasted_inside_itself_through_symlink() {
        let (temp, _src, dest) = setup();
        let back = temp.path().join("back");
        symlink(&dest, &back).unwrap();
        fs::write(dest.join("x"), "x").unwrap();
        let mut clipboard = Clipboard::new();
        clipboard.yank(vec![dest.clone()]);

        let report = clipboard.paste(&back);

        assert!(matches!(report.failed.as_slice(), [Error::IntoItself(_)]));
        assert!(!dest.join("d").exists());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
    }
}
