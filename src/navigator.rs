#![forbid(unsafe_code)]

//! The mode state machine behind the browser.
//!
//! [`Navigator::dispatch`] takes one logical [`Action`], applies it to the
//! state of the current [`Mode`], refreshes whatever list it touched, and
//! tells the caller what to do next through an [`Outcome`]. Every failure is
//! reported on the status line; `dispatch` itself cannot fail.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog;
use crate::clipboard::Clipboard;
use crate::fs_ops::remove_path;
use crate::list::{ListView, RefreshMode};
use crate::model::{ClipboardMode, Entry, ListItem, Mode, MountEntry};
use crate::mounts::MountController;
use crate::selection::SelectionSet;
use crate::text_entry::{self, EditKey, InputTarget, TextEntry};
use crate::viewer::{PAGE_LINES, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Activate,
    Mark,
    Yank,
    Cut,
    Paste,
    New,
    Rename,
    Delete,
    View,
    MountMenu,
    Unmount,
    ToggleHidden,
    Filter,
    Edit(EditKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Suspend the UI and open this file in the external editor.
    Edit(PathBuf),
}

#[derive(Debug)]
pub struct NavigatorState {
    pub mode: Mode,
    pub cwd: PathBuf,
    pub show_hidden: bool,
}

#[derive(Debug)]
pub struct Navigator {
    state: NavigatorState,
    browse: ListView,
    mounts: ListView,
    selection: SelectionSet,
    clipboard: Clipboard,
    input: Option<TextEntry>,
    viewer: Option<Viewer>,
    devices: MountController,
    status: String,
}

impl Navigator {
    pub fn new(cwd: PathBuf, devices: MountController) -> Self {
        let mut navigator = Self {
            state: NavigatorState {
                mode: Mode::Browse,
                cwd,
                show_hidden: false,
            },
            browse: ListView::new(),
            mounts: ListView::new(),
            selection: SelectionSet::new(),
            clipboard: Clipboard::new(),
            input: None,
            viewer: None,
            devices,
            status: String::from("Ready"),
        };
        navigator.refresh(RefreshMode::Reset);
        navigator
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn cwd(&self) -> &Path {
        &self.state.cwd
    }

    pub fn show_hidden(&self) -> bool {
        self.state.show_hidden
    }

    pub fn browse(&self) -> &ListView {
        &self.browse
    }

    pub fn mounts(&self) -> &ListView {
        &self.mounts
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn input(&self) -> Option<&TextEntry> {
        self.input.as_ref()
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// True while keystrokes edit the browse filter instead of acting.
    pub fn is_filtering(&self) -> bool {
        self.state.mode == Mode::Browse && self.browse.is_filtering()
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        debug!(?action, mode = ?self.state.mode, "dispatch");
        match self.state.mode {
            Mode::Browse if self.browse.is_filtering() => {
                self.dispatch_filter(action);
                Outcome::Continue
            }
            Mode::Browse => self.dispatch_browse(action),
            Mode::Mounts => {
                self.dispatch_mounts(action);
                Outcome::Continue
            }
            Mode::Input => {
                self.dispatch_input(action);
                Outcome::Continue
            }
            Mode::View => {
                self.dispatch_view(action);
                Outcome::Continue
            }
        }
    }

    /// Called once the external editor has exited.
    pub fn editor_closed(&mut self, result: io::Result<()>) {
        match result {
            Ok(()) => self.status = "Editor closed".to_string(),
            Err(err) => self.report(format!("Editor failed: {err}")),
        }
        self.state.mode = Mode::Browse;
        self.refresh(RefreshMode::Keep);
    }

    fn dispatch_browse(&mut self, action: Action) -> Outcome {
        match action {
            Action::Quit => return Outcome::Quit,
            Action::Up => self.browse.move_by(-1),
            Action::Down => self.browse.move_by(1),
            Action::PageUp => self.browse.move_by(-self.browse.page()),
            Action::PageDown => self.browse.move_by(self.browse.page()),
            Action::Home => self.browse.select_first(),
            Action::End => self.browse.select_last(),
            Action::ToggleHidden => {
                self.state.show_hidden = !self.state.show_hidden;
                self.status = if self.state.show_hidden {
                    "Showing hidden files".to_string()
                } else {
                    "Hiding hidden files".to_string()
                };
                self.refresh(RefreshMode::Keep);
            }
            Action::Activate => {
                let Some(entry) = self.selected_entry().cloned() else {
                    return Outcome::Continue;
                };
                if entry.is_dir {
                    self.change_dir(entry.path);
                } else {
                    return Outcome::Edit(entry.path);
                }
            }
            Action::Mark => {
                if let Some(entry) = self.selected_entry().cloned() {
                    self.selection.toggle(&entry);
                }
            }
            Action::Yank => self.capture(ClipboardMode::Copy),
            Action::Cut => self.capture(ClipboardMode::Cut),
            Action::Paste => self.paste(),
            Action::New => {
                self.input = Some(TextEntry::create());
                self.state.mode = Mode::Input;
            }
            Action::Rename => {
                if let Some(entry) = self.selected_entry().filter(|e| !e.is_parent_link) {
                    self.input = Some(TextEntry::rename(entry));
                    self.state.mode = Mode::Input;
                }
            }
            Action::Delete => self.delete_selected(),
            Action::View => self.open_viewer(),
            Action::MountMenu => {
                self.reload_mounts(RefreshMode::Reset);
                self.state.mode = Mode::Mounts;
            }
            Action::Filter => self.browse.start_filter(),
            Action::Back => {
                if !self.browse.filter().is_empty() {
                    self.browse.clear_filter();
                }
            }
            Action::Unmount | Action::Edit(_) => {}
        }
        Outcome::Continue
    }

    fn dispatch_filter(&mut self, action: Action) {
        match action {
            Action::Edit(EditKey::Insert(ch)) => {
                let mut query = self.browse.filter().to_string();
                query.push(ch);
                self.browse.set_filter(query);
            }
            Action::Edit(EditKey::Backspace) => {
                let mut query = self.browse.filter().to_string();
                query.pop();
                self.browse.set_filter(query);
            }
            Action::Activate => self.browse.accept_filter(),
            Action::Back => self.browse.clear_filter(),
            Action::Up => self.browse.move_by(-1),
            Action::Down => self.browse.move_by(1),
            _ => {}
        }
    }

    fn dispatch_mounts(&mut self, action: Action) {
        match action {
            Action::Back => self.state.mode = Mode::Browse,
            Action::Up => self.mounts.move_by(-1),
            Action::Down => self.mounts.move_by(1),
            Action::PageUp => self.mounts.move_by(-self.mounts.page()),
            Action::PageDown => self.mounts.move_by(self.mounts.page()),
            Action::Home => self.mounts.select_first(),
            Action::End => self.mounts.select_last(),
            Action::Activate => {
                let Some(mount) = self.selected_mount().cloned() else {
                    return;
                };
                match mount.mount_point {
                    None => {
                        self.status = match self.devices.mount(&mount.device) {
                            Ok(()) => format!("Mounted {}", mount.device),
                            Err(err) => format!("Mount failed: {err}"),
                        };
                        self.reload_mounts(RefreshMode::Keep);
                    }
                    Some(point) => {
                        self.state.mode = Mode::Browse;
                        self.change_dir(point);
                    }
                }
            }
            Action::Unmount => {
                let Some(mount) = self.selected_mount().cloned() else {
                    return;
                };
                if mount.mount_point.is_none() {
                    self.status = format!("{} is not mounted", mount.device);
                    return;
                }
                self.status = match self.devices.unmount(&mount.device) {
                    Ok(()) => format!("Unmounted {}", mount.device),
                    Err(err) => format!("Unmount failed: {err}"),
                };
                self.reload_mounts(RefreshMode::Keep);
            }
            _ => {}
        }
    }

    fn dispatch_input(&mut self, action: Action) {
        match action {
            Action::Back => {
                self.input = None;
                self.state.mode = Mode::Browse;
                self.status = "Cancelled".to_string();
            }
            Action::Activate => self.commit_input(),
            Action::Edit(key) => {
                if let Some(input) = self.input.as_mut() {
                    input.edit(key);
                }
            }
            _ => {}
        }
    }

    fn dispatch_view(&mut self, action: Action) {
        if matches!(action, Action::Back | Action::Quit) {
            self.viewer = None;
            self.state.mode = Mode::Browse;
            return;
        }
        let Some(viewer) = self.viewer.as_mut() else {
            self.state.mode = Mode::Browse;
            return;
        };
        match action {
            Action::Up => viewer.scroll_by(-1),
            Action::Down => viewer.scroll_by(1),
            Action::PageUp => viewer.scroll_by(-(PAGE_LINES as isize)),
            Action::PageDown => viewer.scroll_by(PAGE_LINES as isize),
            Action::Home => viewer.scroll_to_top(),
            Action::End => viewer.scroll_to_bottom(),
            _ => {}
        }
    }

    fn selected_entry(&self) -> Option<&Entry> {
        self.browse.selected().and_then(ListItem::as_entry)
    }

    fn selected_mount(&self) -> Option<&MountEntry> {
        self.mounts.selected().and_then(ListItem::as_mount)
    }

    /// Re-reads the current directory. On failure the previous listing
    /// stays and the error goes to the status line.
    fn refresh(&mut self, mode: RefreshMode) -> bool {
        match catalog::list(&self.state.cwd, self.state.show_hidden) {
            Ok(entries) => {
                self.selection.prune_missing();
                self.browse
                    .set_items(entries.into_iter().map(ListItem::File).collect(), mode);
                true
            }
            Err(err) => {
                self.report(format!("Cannot read {}: {err}", self.state.cwd.display()));
                false
            }
        }
    }

    fn change_dir(&mut self, path: PathBuf) {
        let previous = std::mem::replace(&mut self.state.cwd, path);
        if !self.refresh(RefreshMode::Reset) {
            self.state.cwd = previous;
            return;
        }
        self.browse.clear_filter();
        // Coming back up lands on the directory just left.
        if previous.parent() == Some(self.state.cwd.as_path()) {
            self.browse.select_where(|item| {
                item.as_entry()
                    .is_some_and(|e| !e.is_parent_link && e.path == previous)
            });
        }
        self.status = self.state.cwd.display().to_string();
    }

    fn capture(&mut self, mode: ClipboardMode) {
        let paths = self.selection.take();
        let count = paths.len();
        match mode {
            ClipboardMode::Cut => self.clipboard.cut(paths),
            _ => self.clipboard.yank(paths),
        }
        self.status = match (mode, count) {
            (_, 0) => "Nothing marked".to_string(),
            (ClipboardMode::Cut, n) => format!("Cut {n} item(s)"),
            (_, n) => format!("Yanked {n} item(s)"),
        };
        self.refresh(RefreshMode::Keep);
    }

    fn paste(&mut self) {
        if self.clipboard.is_empty() {
            self.status = "Clipboard is empty".to_string();
            return;
        }
        let report = self.clipboard.paste(&self.state.cwd);
        if report.failed.is_empty() {
            self.status = report.summary();
        } else {
            self.report(report.summary());
        }
        self.refresh(RefreshMode::Keep);
    }

    fn delete_selected(&mut self) {
        let Some(entry) = self.selected_entry().filter(|e| !e.is_parent_link).cloned() else {
            return;
        };
        match remove_path(&entry.path) {
            Ok(()) => {
                info!(path = %entry.path.display(), "deleted");
                self.selection.remove(&entry.path);
                self.status = format!("Deleted {}", entry.name);
            }
            Err(err) => self.report(format!("Delete failed: {err}")),
        }
        self.refresh(RefreshMode::Keep);
    }

    fn open_viewer(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if entry.is_dir || entry.is_parent_link {
            self.status = "Cannot view a directory".to_string();
            return;
        }
        let path = entry.path.clone();
        match Viewer::load(&path) {
            Ok(viewer) => {
                self.viewer = Some(viewer);
                self.state.mode = Mode::View;
            }
            Err(err) => self.report(format!("View failed: {err}")),
        }
    }

    fn commit_input(&mut self) {
        self.state.mode = Mode::Browse;
        let Some(input) = self.input.take() else {
            return;
        };
        let result = text_entry::commit(&input.target, input.value(), &self.state.cwd);
        self.refresh(RefreshMode::Keep);
        match result {
            Ok(Some(path)) => {
                info!(path = %path.display(), kind = input.title(), "committed");
                let verb = match input.target {
                    InputTarget::Create => "Created",
                    InputTarget::Rename { .. } => "Renamed to",
                };
                self.status = format!("{verb} {}", path.display());
                self.browse.select_where(|item| {
                    item.as_entry()
                        .is_some_and(|e| !e.is_parent_link && path.starts_with(&e.path))
                });
            }
            Ok(None) => self.status = "Nothing entered".to_string(),
            Err(err) => self.report(format!("{} failed: {err}", input.title())),
        }
    }

    fn reload_mounts(&mut self, mode: RefreshMode) {
        match self.devices.enumerate() {
            Ok(entries) => {
                self.mounts
                    .set_items(entries.into_iter().map(ListItem::Mount).collect(), mode);
            }
            Err(err) => {
                self.mounts.set_items(Vec::new(), mode);
                self.report(format!("Device listing failed: {err}"));
            }
        }
    }

    fn report(&mut self, message: String) {
        warn!("{message}");
        self.status = message;
    }
}
