#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PAGE_LINES: usize = 10;

/// A read-only, fully loaded file with a scroll position.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub path: PathBuf,
    lines: Vec<String>,
    scroll: usize,
}

impl Viewer {
    /// Reads the whole file. Invalid UTF-8 is replaced, not rejected.
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        let content = String::from_utf8_lossy(&data);
        Ok(Self {
            path: path.to_path_buf(),
            lines: content.lines().map(|line| line.to_string()).collect(),
            scroll: 0,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll.saturating_add_signed(delta);
        self.scroll = next.min(self.last_line());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.last_line();
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}
