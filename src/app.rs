#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    event, execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ftui::prelude::*;
use ftui::render::budget::FrameBudgetConfig;
use ftui::render::cell::PackedRgba;
use ftui::{KeyEventKind, Program, ProgramConfig};
use tracing::{debug, info};

use crate::config::{Config, EditorCommand};
use crate::keymap;
use crate::mounts::{MountController, Udisks};
use crate::navigator::{Navigator, Outcome};
use crate::ui;

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub screen_bg: PackedRgba,
    pub title_bg: PackedRgba,
    pub title_fg: PackedRgba,
    pub panel_bg: PackedRgba,
    pub panel_fg: PackedRgba,
    pub panel_border: PackedRgba,
    pub header_bg: PackedRgba,
    pub header_fg: PackedRgba,
    pub selection_bg: PackedRgba,
    pub selection_fg: PackedRgba,
    pub marked_fg: PackedRgba,
    pub dir_fg: PackedRgba,
    pub keybar_bg: PackedRgba,
    pub keybar_fg: PackedRgba,
    pub status_bg: PackedRgba,
    pub status_fg: PackedRgba,
    pub dialog_bg: PackedRgba,
    pub dialog_fg: PackedRgba,
}

impl ThemeColors {
    pub fn classic() -> Self {
        Self {
            // VGA 16-color palette
            screen_bg: PackedRgba::rgb(0, 0, 170),
            title_bg: PackedRgba::rgb(0, 170, 170),
            title_fg: PackedRgba::rgb(255, 255, 255),
            panel_bg: PackedRgba::rgb(0, 0, 170),
            panel_fg: PackedRgba::rgb(170, 170, 170),
            panel_border: PackedRgba::rgb(85, 255, 255),
            header_bg: PackedRgba::rgb(0, 0, 170),
            header_fg: PackedRgba::rgb(255, 255, 255),
            selection_bg: PackedRgba::rgb(170, 170, 0),
            selection_fg: PackedRgba::rgb(0, 0, 0),
            marked_fg: PackedRgba::rgb(255, 255, 85),
            dir_fg: PackedRgba::rgb(255, 255, 255),
            keybar_bg: PackedRgba::rgb(0, 170, 170),
            keybar_fg: PackedRgba::rgb(255, 255, 255),
            status_bg: PackedRgba::rgb(0, 0, 170),
            status_fg: PackedRgba::rgb(255, 255, 255),
            dialog_bg: PackedRgba::rgb(170, 170, 170),
            dialog_fg: PackedRgba::rgb(0, 0, 0),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Event(Event),
    Quit,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

#[derive(Debug)]
pub struct App {
    navigator: Navigator,
    editor: EditorCommand,
    theme: ThemeColors,
    force_clear_frames: RefCell<u8>,
}

impl App {
    pub fn new(config: &Config) -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let devices = MountController::new(Box::new(Udisks));
        Ok(Self {
            navigator: Navigator::new(cwd, devices),
            editor: config.editor.clone(),
            theme: ThemeColors::classic(),
            force_clear_frames: RefCell::new(0),
        })
    }

    pub fn run(config: &Config) -> io::Result<()> {
        let mut budget = FrameBudgetConfig::with_total(Duration::from_millis(50));
        budget.allow_frame_skip = false;
        let program_config = ProgramConfig::fullscreen().with_budget(budget);
        let mut program = Program::with_config(App::new(config)?, program_config)?;
        info!("starting");
        program.run()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind != KeyEventKind::Press {
            return Cmd::none();
        }
        if key.modifiers.contains(Modifiers::CTRL) {
            return match key.code {
                KeyCode::Char('c') => Cmd::quit(),
                _ => Cmd::none(),
            };
        }
        let mode = self.navigator.mode();
        let Some(action) = keymap::action_for(mode, self.navigator.is_filtering(), key.code) else {
            debug!(code = ?key.code, ?mode, "unbound key");
            return Cmd::none();
        };
        match self.navigator.dispatch(action) {
            Outcome::Continue => Cmd::none(),
            Outcome::Quit => Cmd::quit(),
            Outcome::Edit(path) => {
                self.open_editor(&path);
                Cmd::none()
            }
        }
    }

    fn open_editor(&mut self, path: &Path) {
        info!(path = %path.display(), editor = %self.editor.program, "launching editor");
        let result = run_external_editor(&self.editor, path);
        *self.force_clear_frames.borrow_mut() = 3;
        self.navigator.editor_closed(result);
    }

    fn render(&self, frame: &mut Frame) {
        frame.set_cursor(None);
        {
            let mut force_clear = self.force_clear_frames.borrow_mut();
            if *force_clear > 0 {
                frame.clear();
                *force_clear = force_clear.saturating_sub(1);
            }
        }
        ui::render(frame, &self.navigator, self.theme);
    }
}

impl Model for App {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(Event::Key(key)) => self.handle_key(key),
            Msg::Event(_) => Cmd::none(),
            Msg::Quit => Cmd::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        self.render(frame);
    }
}

/// Hands the terminal to `editor` until it exits, then takes it back and
/// discards whatever input arrived in the meantime.
pub fn run_external_editor(editor: &EditorCommand, path: &Path) -> io::Result<()> {
    let mut stdout = std::io::stdout();
    crossterm::terminal::disable_raw_mode().ok();
    execute!(stdout, LeaveAlternateScreen)?;
    let status = std::process::Command::new(&editor.program)
        .args(&editor.args)
        .arg(path)
        .status();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), MoveTo(0, 0))?;
    crossterm::terminal::enable_raw_mode().ok();
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read();
    }
    let status = status?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("{} exited with {status}", editor.program)))
    }
}
