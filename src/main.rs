#![forbid(unsafe_code)]

mod app;
mod catalog;
mod clipboard;
mod config;
mod error;
mod fs_ops;
mod keymap;
mod list;
mod logging;
mod model;
mod mounts;
mod navigator;
mod selection;
mod text_entry;
mod ui;
mod viewer;

use std::io;

use crate::app::App;
use crate::config::Config;

fn main() -> io::Result<()> {
    let config = Config::from_env();
    if let Err(err) = logging::init(config.log.as_ref()) {
        eprintln!("ferrofm: logging disabled: {err}");
    }
    App::run(&config)
}
