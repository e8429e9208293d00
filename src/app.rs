//! Application state and main loop of the interactive terminal.
//!
//! The app owns the execution engine and at most one running invocation.
//! Each loop iteration waits for either a user event or the next output
//! event of the running command, applies it, and redraws.

use std::path::Path;

use anyhow::{Context, Result};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::Receiver;
use tracing::info;

use crate::event::terminal::{self as terminal_event, TerminalAction};
use crate::event::{UserEvent, init_user_event};
use crate::shell::{OutputEvent, OutputStream, ShellEngine};
use crate::ui::terminal::TuiTerminal;

pub struct App {
    // backend
    engine: ShellEngine,
    running: Option<OutputStream>,

    // frontend widget, public to the ui module
    pub(in super) tui_terminal: TuiTerminal,

    exit: bool,

    user_events: Receiver<std::io::Result<UserEvent>>,
}

impl App {
    pub fn new(engine: ShellEngine) -> Self {
        Self {
            engine,
            running: None,
            tui_terminal: TuiTerminal::new(),
            exit: false,
            user_events: init_user_event(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn cwd(&self) -> &Path {
        self.engine.cwd()
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.exit {
                break Ok(());
            }
            tokio::select! {
                res = self.user_events.recv() => {
                    let usr_evt = res.with_context(|| anyhow::anyhow!("User event stream is ended."))?;
                    self.handle_user_event(usr_evt?);
                }
                output = next_output(&mut self.running) => {
                    self.handle_output(output);
                }
            }
            self.draw(terminal)?;
        }
    }

    pub fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut cursor = (0, 0);
        terminal.draw(|frame| {
            let area = frame.area();
            use ratatui::widgets::Widget;
            (&*self).render(area, frame.buffer_mut());

            let inner = ratatui::widgets::Block::bordered().inner(area);
            cursor = self.tui_terminal.cursor_position(inner);
        })?;

        terminal.show_cursor()?;
        terminal.set_cursor_position(cursor)?;
        Ok(())
    }

    fn handle_user_event(&mut self, event: UserEvent) {
        let UserEvent::Key(key_evt) = event else {
            return;
        };

        let action = terminal_event::handle_key_event(
            &mut self.tui_terminal,
            self.engine.state().history(),
            self.running.is_some(),
            key_evt,
        );

        match action {
            TerminalAction::None => {}
            TerminalAction::Execute(command) => {
                info!(command = %command, "executing");
                self.running = Some(self.engine.execute(&command));
            }
            TerminalAction::Cancel => {
                // Dropping the stream kills the child and its pumps.
                if self.running.take().is_some() {
                    info!("cancelled running command");
                    self.tui_terminal.show_notice("Cancelled");
                }
            }
            TerminalAction::Quit => {
                self.running = None;
                self.exit = true;
            }
        }
    }

    fn handle_output(&mut self, output: Option<OutputEvent>) {
        match output {
            Some(event) => {
                self.tui_terminal.push_event(&event);
                if event.is_terminal() {
                    self.running = None;
                }
            }
            None => self.running = None,
        }
    }
}

/// Next event of the running invocation; pending forever when idle.
async fn next_output(running: &mut Option<OutputStream>) -> Option<OutputEvent> {
    match running {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}
