//! Key event handling for the terminal pane.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::context::History;
use crate::ui::terminal::TuiTerminal;

/// Rows moved per PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// What the app has to do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    /// Handled locally, nothing else to do.
    None,
    /// Run this command.
    Execute(String),
    /// Abandon the running command.
    Cancel,
    Quit,
}

/// Apply `key_evt` to the terminal pane.
///
/// `running` tells whether a command is in flight: Enter is ignored while
/// one is, and Ctrl+C only cancels when one is.
pub fn handle_key_event(
    terminal: &mut TuiTerminal,
    history: &History,
    running: bool,
    key_evt: KeyEvent,
) -> TerminalAction {
    if key_evt.kind != KeyEventKind::Press {
        return TerminalAction::None;
    }

    let ctrl = key_evt.modifiers.contains(KeyModifiers::CONTROL);
    match key_evt.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => {
            if running {
                TerminalAction::Cancel
            } else {
                terminal.input_mut().take();
                TerminalAction::None
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') if ctrl => TerminalAction::Quit,
        KeyCode::Esc => TerminalAction::Quit,
        KeyCode::Char(_) if ctrl => TerminalAction::None,
        KeyCode::Char(c) => {
            terminal.input_mut().insert(c);
            TerminalAction::None
        }
        KeyCode::Enter => {
            if running {
                return TerminalAction::None;
            }
            match terminal.submit() {
                Some(command) => TerminalAction::Execute(command),
                None => TerminalAction::None,
            }
        }
        KeyCode::Backspace => {
            terminal.input_mut().backspace();
            TerminalAction::None
        }
        KeyCode::Delete => {
            terminal.input_mut().delete();
            TerminalAction::None
        }
        KeyCode::Left => {
            terminal.input_mut().move_left();
            TerminalAction::None
        }
        KeyCode::Right => {
            terminal.input_mut().move_right();
            TerminalAction::None
        }
        KeyCode::Home => {
            terminal.input_mut().move_home();
            TerminalAction::None
        }
        KeyCode::End => {
            terminal.input_mut().move_end();
            TerminalAction::None
        }
        KeyCode::Up => {
            terminal.history_prev(|n| history.nth_recent(n));
            TerminalAction::None
        }
        KeyCode::Down => {
            terminal.history_next(|n| history.nth_recent(n));
            TerminalAction::None
        }
        KeyCode::PageUp => {
            terminal.scroll_up(PAGE_SCROLL);
            TerminalAction::None
        }
        KeyCode::PageDown => {
            terminal.scroll_down(PAGE_SCROLL);
            TerminalAction::None
        }
        _ => TerminalAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(term: &mut TuiTerminal, history: &History, s: &str) {
        for c in s.chars() {
            handle_key_event(term, history, false, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_enter_executes_typed_command() {
        let mut term = TuiTerminal::new();
        let history = History::new();
        type_str(&mut term, &history, "ls -la");

        let action = handle_key_event(&mut term, &history, false, key(KeyCode::Enter));

        assert_eq!(action, TerminalAction::Execute("ls -la".to_string()));
        assert!(term.input().is_empty());
    }

    #[test]
    fn test_enter_ignored_while_running() {
        let mut term = TuiTerminal::new();
        let history = History::new();
        type_str(&mut term, &history, "pwd");

        let action = handle_key_event(&mut term, &history, true, key(KeyCode::Enter));

        assert_eq!(action, TerminalAction::None);
        assert_eq!(term.input().text(), "pwd");
    }

    #[test]
    fn test_ctrl_c_cancels_only_when_running() {
        let mut term = TuiTerminal::new();
        let history = History::new();

        assert_eq!(handle_key_event(&mut term, &history, true, ctrl('c')), TerminalAction::Cancel);

        type_str(&mut term, &history, "half typed");
        assert_eq!(handle_key_event(&mut term, &history, false, ctrl('c')), TerminalAction::None);
        assert!(term.input().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut term = TuiTerminal::new();
        let history = History::new();

        assert_eq!(handle_key_event(&mut term, &history, false, ctrl('q')), TerminalAction::Quit);
        assert_eq!(handle_key_event(&mut term, &history, true, key(KeyCode::Esc)), TerminalAction::Quit);
    }

    #[test]
    fn test_up_recalls_history() {
        let mut term = TuiTerminal::new();
        let mut history = History::new();
        history.record("make".to_string(), Local::now(), "/".into());
        history.record("make test".to_string(), Local::now(), "/".into());

        handle_key_event(&mut term, &history, false, key(KeyCode::Up));
        assert_eq!(term.input().text(), "make test");
        handle_key_event(&mut term, &history, false, key(KeyCode::Up));
        assert_eq!(term.input().text(), "make");
        handle_key_event(&mut term, &history, false, key(KeyCode::Down));
        assert_eq!(term.input().text(), "make test");
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut term = TuiTerminal::new();
        let history = History::new();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;

        handle_key_event(&mut term, &history, false, release);

        assert!(term.input().is_empty());
    }
}
