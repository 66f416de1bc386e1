#![forbid(unsafe_code)]

//! Key codes to navigator actions, one table per mode.

use ftui::prelude::*;

use crate::model::Mode;
use crate::navigator::Action;
use crate::text_entry::EditKey;

/// Translates a key press for the given mode. `filtering` routes Browse
/// keys to the filter editor instead.
pub fn action_for(mode: Mode, filtering: bool, code: KeyCode) -> Option<Action> {
    match mode {
        Mode::Browse if filtering => filter_action(code),
        Mode::Browse => browse_action(code),
        Mode::Mounts => mounts_action(code),
        Mode::Input => input_action(code),
        Mode::View => view_action(code),
    }
}

fn browse_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Enter => Action::Activate,
        KeyCode::Escape => Action::Back,
        KeyCode::Char(' ') => Action::Mark,
        KeyCode::Char('y') => Action::Yank,
        KeyCode::Char('x') => Action::Cut,
        KeyCode::Char('p') => Action::Paste,
        KeyCode::Char('i') => Action::New,
        KeyCode::Char('r') => Action::Rename,
        KeyCode::Char('d') => Action::Delete,
        KeyCode::Char('v') => Action::View,
        KeyCode::Char('m') => Action::MountMenu,
        KeyCode::Char('h') => Action::ToggleHidden,
        KeyCode::Char('/') => Action::Filter,
        KeyCode::Char('q') => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn filter_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Enter => Action::Activate,
        KeyCode::Escape => Action::Back,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Backspace => Action::Edit(EditKey::Backspace),
        KeyCode::Char(ch) => Action::Edit(EditKey::Insert(ch)),
        _ => return None,
    };
    Some(action)
}

fn mounts_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Enter => Action::Activate,
        KeyCode::Char('u') => Action::Unmount,
        KeyCode::Escape => Action::Back,
        _ => return None,
    };
    Some(action)
}

fn input_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Enter => Action::Activate,
        KeyCode::Escape => Action::Back,
        KeyCode::Backspace => Action::Edit(EditKey::Backspace),
        KeyCode::Delete => Action::Edit(EditKey::Delete),
        KeyCode::Left => Action::Edit(EditKey::Left),
        KeyCode::Right => Action::Edit(EditKey::Right),
        KeyCode::Home => Action::Edit(EditKey::Home),
        KeyCode::End => Action::Edit(EditKey::End),
        KeyCode::Char(ch) => Action::Edit(EditKey::Insert(ch)),
        _ => return None,
    };
    Some(action)
}

fn view_action(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Escape => Action::Back,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        _ => return None,
    };
    Some(action)
}

/// Key bar contents as `(key, label)` pairs.
pub fn hints(mode: Mode, filtering: bool) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::Browse if filtering => &[("Enter", "Keep"), ("Esc", "Clear")],
        Mode::Browse => &[
            ("Space", "Mark"),
            ("y", "Yank"),
            ("x", "Cut"),
            ("p", "Paste"),
            ("i", "New"),
            ("r", "Rename"),
            ("d", "Delete"),
            ("v", "View"),
            ("m", "Mounts"),
            ("h", "Hidden"),
            ("/", "Filter"),
            ("q", "Quit"),
        ],
        Mode::Mounts => &[("Enter", "Mount/Open"), ("u", "Unmount"), ("Esc", "Back")],
        Mode::Input => &[("Enter", "Commit"), ("Esc", "Cancel")],
        Mode::View => &[("PgUp/PgDn", "Scroll"), ("Esc", "Back")],
    }
}
