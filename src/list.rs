#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};

use ftui::widgets::table::TableState;

use crate::model::ListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Cursor back to the first row.
    Reset,
    /// Cursor stays on the same item when it is still listed.
    Keep,
}

/// A scrollable, filterable list of rows. The cursor lives in the table
/// state so the renderer can draw it directly.
#[derive(Debug, Default)]
pub struct ListView {
    items: Vec<ListItem>,
    visible: Vec<usize>,
    filter: String,
    filtering: bool,
    state: RefCell<TableState>,
    view_height: Cell<usize>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, items: Vec<ListItem>, mode: RefreshMode) {
        let previous = match mode {
            RefreshMode::Keep => self.selected().cloned(),
            RefreshMode::Reset => None,
        };
        let previous_index = self.state.borrow().selected.unwrap_or(0);
        self.items = items;
        self.apply_filter();

        if let Some(previous) = previous {
            if self.select_where(|item| item.same_item(&previous)) {
                return;
            }
        }
        let mut state = self.state.borrow_mut();
        if self.visible.is_empty() {
            state.select(None);
            state.offset = 0;
            return;
        }
        match mode {
            RefreshMode::Reset => {
                state.select(Some(0));
                state.offset = 0;
            }
            RefreshMode::Keep => {
                state.select(Some(previous_index.min(self.visible.len() - 1)));
                ensure_visible(&mut state, self.view_height.get());
            }
        }
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &ListItem> {
        self.visible.iter().map(|&idx| &self.items[idx])
    }

    pub fn selected(&self) -> Option<&ListItem> {
        let idx = self.state.borrow().selected?;
        self.visible.get(idx).map(|&item| &self.items[item])
    }

    /// Moves the cursor to the first visible item matching `pred`.
    pub fn select_where(&mut self, pred: impl Fn(&ListItem) -> bool) -> bool {
        let Some(pos) = self.visible.iter().position(|&idx| pred(&self.items[idx])) else {
            return false;
        };
        let mut state = self.state.borrow_mut();
        state.select(Some(pos));
        ensure_visible(&mut state, self.view_height.get());
        true
    }

    pub fn move_by(&mut self, delta: i32) {
        let mut state = self.state.borrow_mut();
        if self.visible.is_empty() {
            state.select(None);
            state.offset = 0;
            return;
        }
        let current = state.selected.unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, (self.visible.len() - 1) as i32) as usize;
        state.select(Some(next));
        ensure_visible(&mut state, self.view_height.get());
    }

    pub fn page(&self) -> i32 {
        self.view_height.get().max(1) as i32
    }

    pub fn select_first(&mut self) {
        self.move_by(i32::MIN / 2);
    }

    pub fn select_last(&mut self) {
        self.move_by(i32::MAX / 2);
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    /// Leaves filter editing but keeps the query applied.
    pub fn accept_filter(&mut self) {
        self.filtering = false;
    }

    pub fn clear_filter(&mut self) {
        self.filtering = false;
        self.set_filter(String::new());
    }

    pub fn set_filter(&mut self, query: String) {
        let previous = self.selected().cloned();
        self.filter = query;
        self.apply_filter();
        let kept = previous.is_some_and(|previous| self.select_where(|item| item.same_item(&previous)));
        if !kept {
            let mut state = self.state.borrow_mut();
            state.select(if self.visible.is_empty() { None } else { Some(0) });
            state.offset = 0;
        }
    }

    fn apply_filter(&mut self) {
        let query = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query.is_empty() || item.title().to_lowercase().contains(&query))
            .map(|(idx, _)| idx)
            .collect();
    }

    pub fn state(&self) -> &RefCell<TableState> {
        &self.state
    }

    /// Rows that fit on screen; recorded by the renderer each frame.
    pub fn set_view_height(&self, height: usize) {
        self.view_height.set(height);
        ensure_visible(&mut self.state.borrow_mut(), height);
    }
}

pub fn ensure_visible(state: &mut TableState, view_height: usize) {
    if view_height == 0 {
        return;
    }
    let Some(selected) = state.selected else {
        return;
    };
    if selected < state.offset {
        state.offset = selected;
    } else if selected >= state.offset + view_height {
        state.offset = selected.saturating_sub(view_height - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MountEntry;

    fn devices(names: &[&str]) -> Vec<ListItem> {
        names
            .iter()
            .map(|name| {
                ListItem::Mount(MountEntry {
                    device: name.to_string(),
                    mount_point: None,
                })
            })
            .collect()
    }

    fn titles(list: &ListView) -> Vec<String> {
        list.visible_items().map(|item| item.title().to_string()).collect()
    }

    fn selected_title(list: &ListView) -> Option<String> {
        list.selected().map(|item| item.title().to_string())
    }

    #[test]
    fn cursor_clamps_to_bounds() {
        let mut list = ListView::new();
        list.set_items(devices(&["a", "b", "c"]), RefreshMode::Reset);
        assert_eq!(selected_title(&list).as_deref(), Some("a"));

        list.move_by(-1);
        assert_eq!(selected_title(&list).as_deref(), Some("a"));
        list.move_by(10);
        assert_eq!(selected_title(&list).as_deref(), Some("c"));
        list.select_first();
        assert_eq!(selected_title(&list).as_deref(), Some("a"));
        list.select_last();
        assert_eq!(selected_title(&list).as_deref(), Some("c"));
    }

    #[test]
    fn keep_refresh_follows_item() {
        let mut list = ListView::new();
        list.set_items(devices(&["a", "b", "c"]), RefreshMode::Reset);
        list.move_by(2);

        list.set_items(devices(&["c", "d"]), RefreshMode::Keep);
        assert_eq!(selected_title(&list).as_deref(), Some("c"));

        list.set_items(devices(&["x"]), RefreshMode::Keep);
        assert_eq!(selected_title(&list).as_deref(), Some("x"));

        list.set_items(Vec::new(), RefreshMode::Keep);
        assert!(list.selected().is_none());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut list = ListView::new();
        list.set_items(devices(&["Alpha", "beta", "ALPINE"]), RefreshMode::Reset);
        list.start_filter();
        list.set_filter("alp".to_string());
        assert_eq!(titles(&list), ["Alpha", "ALPINE"]);
        assert!(list.is_filtering());

        list.accept_filter();
        assert!(!list.is_filtering());
        assert_eq!(list.visible_items().count(), 2);

        list.clear_filter();
        assert_eq!(list.visible_items().count(), 3);
        assert_eq!(list.filter(), "");
    }

    #[test]
    fn scrolling_keeps_cursor_visible() {
        let mut list = ListView::new();
        list.set_items(devices(&["a", "b", "c", "d", "e"]), RefreshMode::Reset);
        list.set_view_height(2);
        list.move_by(3);
        assert_eq!(list.state().borrow().offset, 2);
        list.move_by(-3);
        assert_eq!(list.state().borrow().offset, 0);
    }
}
