#![forbid(unsafe_code)]

use ftui::core::geometry::Rect;
use ftui::layout::{Constraint, Flex};
use ftui::style::Style;
use ftui::text::{Text, WrapMode, display_width};
use ftui::widgets::block::Block;
use ftui::widgets::borders::Borders;
use ftui::widgets::paragraph::Paragraph;
use ftui::widgets::status_line::{StatusItem, StatusLine};
use ftui::widgets::table::{Row, Table};
use ftui::widgets::{StatefulWidget, Widget};
use ftui::Frame;

use crate::app::ThemeColors;
use crate::clipboard::Clipboard;
use crate::keymap;
use crate::list::ListView;
use crate::model::{ClipboardMode, ListItem, Mode};
use crate::navigator::Navigator;
use crate::selection::SelectionSet;
use crate::text_entry::TextEntry;
use crate::viewer::Viewer;

pub const TITLE_HEIGHT: u16 = 1;
pub const STATUS_HEIGHT: u16 = 1;
pub const KEYBAR_HEIGHT: u16 = 1;
pub const HEADER_HEIGHT: u16 = 1;
const DETAILS_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, navigator: &Navigator, theme: ThemeColors) {
    let full = Rect::new(0, 0, frame.width(), frame.height());
    render_background(frame, full, theme);

    if navigator.mode() == Mode::View {
        if let Some(viewer) = navigator.viewer() {
            render_viewer(frame, full, viewer, theme);
            return;
        }
    }

    let areas = Flex::vertical()
        .constraints([
            Constraint::Fixed(TITLE_HEIGHT),
            Constraint::Fill,
            Constraint::Fixed(STATUS_HEIGHT),
            Constraint::Fixed(KEYBAR_HEIGHT),
        ])
        .split(full);

    render_title(frame, areas[0], navigator, theme);
    match navigator.mode() {
        Mode::Mounts => {
            render_list(frame, areas[1], navigator.mounts(), "Block devices", navigator.selection(), theme)
        }
        _ => {
            let title = navigator.cwd().display().to_string();
            render_list(frame, areas[1], navigator.browse(), &title, navigator.selection(), theme)
        }
    }
    render_status(
        frame,
        areas[2],
        navigator.status(),
        navigator.selection(),
        navigator.clipboard(),
        theme,
    );
    render_keybar(frame, areas[3], navigator.mode(), navigator.is_filtering(), theme);

    if let Some(input) = navigator.input() {
        render_prompt(frame, full, input, theme);
    }
}

fn render_background(frame: &mut Frame, area: Rect, theme: ThemeColors) {
    let background = Block::new().style(Style::new().fg(theme.panel_fg).bg(theme.screen_bg));
    background.render(area, frame);
}

fn render_title(frame: &mut Frame, area: Rect, navigator: &Navigator, theme: ThemeColors) {
    let style = Style::new().fg(theme.title_fg).bg(theme.title_bg);
    Block::new().style(style).render(area, frame);

    let mut line = match navigator.mode() {
        Mode::Mounts => " ferrofm  devices".to_string(),
        _ => format!(" ferrofm  {}", navigator.cwd().display()),
    };
    if navigator.show_hidden() {
        line.push_str(" (hidden)");
    }
    let browse = navigator.browse();
    if navigator.mode() != Mode::Mounts && (browse.is_filtering() || !browse.filter().is_empty()) {
        line.push_str("  /");
        line.push_str(browse.filter());
    }
    Paragraph::new(Text::from(line.clone()))
        .style(style)
        .render(area, frame);
    if navigator.is_filtering() {
        let x = area.x + (display_width(&line) as u16).min(area.width.saturating_sub(1));
        frame.set_cursor(Some((x, area.y)));
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    list: &ListView,
    title: &str,
    selection: &SelectionSet,
    theme: ThemeColors,
) {
    list.set_view_height(area.height.saturating_sub(2 + HEADER_HEIGHT) as usize);

    let block = Block::bordered()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(theme.panel_border))
        .style(Style::new().fg(theme.panel_fg).bg(theme.panel_bg))
        .title(title);

    let header = Row::new(["", "Name", "Details"])
        .style(Style::new().fg(theme.header_fg).bg(theme.header_bg))
        .height(HEADER_HEIGHT);

    let rows = list
        .visible_items()
        .map(|item| {
            let marked = item
                .as_entry()
                .is_some_and(|entry| selection.contains(&entry.path));
            let marker = if marked { "*" } else { " " };
            let mut row = Row::new([
                marker.to_string(),
                item.title().to_string(),
                item.description(marked),
            ])
            .height(1);
            if marked {
                row = row.style(Style::new().fg(theme.marked_fg).bg(theme.panel_bg));
            } else if is_directory(item) {
                row = row.style(Style::new().fg(theme.dir_fg).bg(theme.panel_bg));
            }
            row
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Fixed(1),
        Constraint::Fill,
        Constraint::Fixed(DETAILS_WIDTH),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::new().fg(theme.panel_fg).bg(theme.panel_bg))
        .highlight_style(Style::new().fg(theme.selection_fg).bg(theme.selection_bg));

    let mut state = list.state().borrow_mut();
    StatefulWidget::render(&table, area, frame, &mut state);
}

fn is_directory(item: &ListItem) -> bool {
    item.as_entry().is_some_and(|entry| entry.is_dir)
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    status: &str,
    selection: &SelectionSet,
    clipboard: &Clipboard,
    theme: ThemeColors,
) {
    let style = Style::new().fg(theme.status_fg).bg(theme.status_bg);
    Block::new().style(style).render(area, frame);
    let right = format!("Marked: {}  Clip: {}", selection.len(), clipboard_label(clipboard));
    let spacing = area
        .width
        .saturating_sub(display_width(status) as u16 + right.len() as u16 + 2);
    let line = format!(" {}{}{}", status, " ".repeat(spacing as usize), right);
    Paragraph::new(Text::from(line)).style(style).render(area, frame);
}

fn clipboard_label(clipboard: &Clipboard) -> String {
    match clipboard.mode() {
        ClipboardMode::None => "empty".to_string(),
        ClipboardMode::Copy => format!("copy {}", clipboard.paths().len()),
        ClipboardMode::Cut => format!("cut {}", clipboard.paths().len()),
    }
}

fn render_keybar(frame: &mut Frame, area: Rect, mode: Mode, filtering: bool, theme: ThemeColors) {
    let style = Style::new().fg(theme.keybar_fg).bg(theme.keybar_bg);
    Block::new().style(style).render(area, frame);
    let mut status = StatusLine::new().style(style);
    for &(key, label) in keymap::hints(mode, filtering) {
        status = status.right(StatusItem::key_hint(key, label));
    }
    status.render(area, frame);
}

fn render_prompt(frame: &mut Frame, full: Rect, input: &TextEntry, theme: ThemeColors) {
    let width = full.width.min(60).max(20);
    let height = 7;
    let x = full.x + (full.width.saturating_sub(width)) / 2;
    let y = full.y + (full.height.saturating_sub(height)) / 2;
    let area = Rect::new(x, y, width, height);
    let style = Style::new().fg(theme.dialog_fg).bg(theme.dialog_bg);
    Block::new().style(style).render(area, frame);
    let block = Block::bordered()
        .border_style(Style::new().fg(theme.panel_border))
        .style(style)
        .title(input.title());

    let field_width = width.saturating_sub(2) as usize;
    let (shown, cursor_col) = visible_field(input.value(), input.cursor(), field_width);
    let text = format!("\n{}\n\n{}", input.label(), shown);
    Paragraph::new(Text::from(text))
        .style(style)
        .block(block)
        .render(area, frame);
    frame.set_cursor(Some((area.x + 1 + cursor_col as u16, area.y + 4)));
}

/// The part of `value` that fits in `width` columns with the cursor in
/// view, and the cursor column within it.
fn visible_field(value: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    // One column is kept free for the cursor at the end.
    let start = (cursor + 1).saturating_sub(width);
    let shown: String = value.chars().skip(start).take(width).collect();
    (shown, cursor - start)
}

fn render_viewer(frame: &mut Frame, area: Rect, viewer: &Viewer, theme: ThemeColors) {
    let style = Style::new().fg(theme.panel_fg).bg(theme.panel_bg);
    let height = area.height.saturating_sub(2) as usize;
    let body = viewer
        .lines()
        .iter()
        .skip(viewer.scroll())
        .take(height)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let title = format!(
        "{}  {}/{}",
        viewer.path.display(),
        (viewer.scroll() + 1).min(viewer.lines().len()),
        viewer.lines().len()
    );
    Paragraph::new(Text::from(body))
        .wrap(WrapMode::None)
        .style(style)
        .block(
            Block::bordered()
                .border_style(Style::new().fg(theme.panel_border))
                .borders(Borders::ALL)
                .title(title.as_str()),
        )
        .render(area, frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn field_scrolls_to_keep_cursor_visible() {
        assert_eq!(visible_field("abc", 3, 10), ("abc".to_string(), 3));
        assert_eq!(visible_field("abcdef", 6, 4), ("def".to_string(), 3));
        assert_eq!(visible_field("abcdef", 1, 4), ("abcd".to_string(), 1));
        assert_eq!(visible_field("abc", 0, 0), (String::new(), 0));
    }

    #[test]
    fn clipboard_label_shows_mode_and_count() {
        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard_label(&clipboard), "empty");
        clipboard.cut(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(clipboard_label(&clipboard), "cut 2");
        clipboard.yank(vec![PathBuf::from("/a")]);
        assert_eq!(clipboard_label(&clipboard), "copy 1");
    }
}
