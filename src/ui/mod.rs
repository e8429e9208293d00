//! User interface for the interactive terminal.
//!
//! The app frame is a bordered block whose title shows the tracked working
//! directory and whether a command is running; the terminal pane fills it.

use ratatui::{
    style::Stylize,
    text::Line,
    widgets::{Block, Borders, Widget},
};

use crate::app::App;

pub mod input;
pub mod terminal;
pub mod transcript;

const HINT: &str = " Enter run | Ctrl+C cancel | PgUp/PgDn scroll | Ctrl+Q quit ";

impl Widget for &App {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer) {
        let state = if self.is_running() { "RUNNING" } else { "READY" };
        let title = format!(" ctf-toolkit [{}] {} ", state, self.cwd().display());
        let outer_block = Block::new()
            .borders(Borders::all())
            .title(Line::from(title.bold()))
            .title_bottom(Line::from(HINT.dim()));
        let inner_area = outer_block.inner(area);
        outer_block.render(area, buf);
        self.tui_terminal.render(inner_area, buf);
    }
}
