//! Terminal UI for the review workbench.
//!
//! The workbench owns the alternate screen for its whole lifetime. All
//! state lives in [`App`]; drawing is a pure projection of that state and
//! is re-run in full after every input event.

mod app;
mod event;
mod theme;
mod ui;

pub use app::App;

use std::io;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::model::pattern::Pattern;

/// Launch the workbench over an already-fetched record set and block
/// until the user quits.
pub fn run(records: Vec<Pattern>, toast_secs: u64) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = App::new(records, toast_secs);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
