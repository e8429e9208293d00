//! Terminal pane: command transcript above, input line below.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Buffer, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::shell::OutputEvent;

use super::input::InputLine;
use super::transcript::Transcript;

const PROMPT: &str = "$ ";

pub struct TuiTerminal {
    transcript: Transcript,
    input: InputLine,
    /// Wrapped lines scrolled up from the bottom.
    scroll_back: usize,
    /// Position while browsing history with Up/Down (0 = latest entry).
    history_pos: Option<usize>,
}

impl Default for TuiTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiTerminal {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: InputLine::new(),
            scroll_back: 0,
            history_pos: None,
        }
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputLine {
        self.history_pos = None;
        &mut self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Take the typed command and echo it into the transcript.
    ///
    /// Returns `None` when the line is blank; the input is cleared either way.
    pub fn submit(&mut self) -> Option<String> {
        self.history_pos = None;
        let command = self.input.take().trim().to_string();
        if command.is_empty() {
            return None;
        }
        self.transcript.push_submitted(&command);
        self.scroll_back = 0;
        Some(command)
    }

    pub fn push_event(&mut self, event: &OutputEvent) {
        self.transcript.push_event(event);
        self.scroll_back = 0;
    }

    pub fn show_notice(&mut self, message: &str) {
        self.transcript.push_str(&format!("[{}]\n", message));
        self.scroll_back = 0;
    }

    /// Step back through history; `recent(n)` yields the n-th latest command.
    pub fn history_prev<'a>(&mut self, recent: impl Fn(usize) -> Option<&'a str>) {
        let next = self.history_pos.map_or(0, |pos| pos + 1);
        if let Some(command) = recent(next) {
            self.input.set(command);
            self.history_pos = Some(next);
        }
    }

    /// Step forward through history, ending on an empty line.
    pub fn history_next<'a>(&mut self, recent: impl Fn(usize) -> Option<&'a str>) {
        match self.history_pos {
            None => {}
            Some(0) => {
                self.history_pos = None;
                self.input.set(String::new());
            }
            Some(pos) => {
                if let Some(command) = recent(pos - 1) {
                    self.input.set(command);
                }
                self.history_pos = Some(pos - 1);
            }
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll_back > 0
    }

    fn split(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        (chunks[0], chunks[1])
    }

    /// Screen position of the input cursor when the pane is drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let (_, input_area) = Self::split(area);
        let prompt = u16::try_from(PROMPT.width()).unwrap_or(u16::MAX);
        let x = input_area
            .x
            .saturating_add(prompt)
            .saturating_add(self.input.cursor_column())
            .min(input_area.right().saturating_sub(1));
        (x, input_area.y)
    }

    /// The slice of wrapped lines visible in a pane `height` rows tall.
    fn visible_lines(&self, width: u16, height: u16) -> Vec<String> {
        let wrapped = self.transcript.wrapped(usize::from(width));
        let height = usize::from(height);
        let max_back = wrapped.len().saturating_sub(height);
        let back = self.scroll_back.min(max_back);
        let end = wrapped.len() - back;
        let start = end.saturating_sub(height);
        wrapped[start..end].to_vec()
    }
}

impl Widget for &TuiTerminal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (output_area, input_area) = TuiTerminal::split(area);

        let lines: Vec<Line> = self
            .visible_lines(output_area.width, output_area.height)
            .into_iter()
            .map(|text| {
                if text.starts_with("[STDERR]") {
                    Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
                } else if text.starts_with("[ERROR]") {
                    Line::from(Span::styled(text, Style::default().fg(Color::Red)))
                } else if text.starts_with("[Exit Code:") || text.starts_with("[Executing...]") {
                    Line::from(Span::styled(text, Style::default().add_modifier(Modifier::DIM)))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        Paragraph::new(lines).render(output_area, buf);

        let input = Line::from(vec![PROMPT.bold(), Span::raw(self.input.text())]);
        Paragraph::new(input).render(input_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(term: &mut TuiTerminal, s: &str) {
        for c in s.chars() {
            term.input_mut().insert(c);
        }
    }

    #[test]
    fn test_submit_echoes_and_clears() {
        let mut term = TuiTerminal::new();
        typed(&mut term, "  whoami ");

        assert_eq!(term.submit(), Some("whoami".to_string()));
        assert!(term.input().is_empty());
        assert!(term.transcript().lines().iter().any(|l| l == "whoami"));
        assert!(term.transcript().lines().iter().any(|l| l == "[Executing...]"));
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut term = TuiTerminal::new();
        typed(&mut term, "   ");

        assert_eq!(term.submit(), None);
        assert_eq!(term.transcript().lines(), &[""]);
    }

    #[test]
    fn test_history_browsing() {
        let commands = ["first", "second", "third"];
        let recent = |n: usize| commands.len().checked_sub(n + 1).map(|i| commands[i]);
        let mut term = TuiTerminal::new();

        term.history_prev(recent);
        assert_eq!(term.input().text(), "third");
        term.history_prev(recent);
        term.history_prev(recent);
        assert_eq!(term.input().text(), "first");
        // Past the oldest entry nothing changes.
        term.history_prev(recent);
        assert_eq!(term.input().text(), "first");

        term.history_next(recent);
        assert_eq!(term.input().text(), "second");
        term.history_next(recent);
        term.history_next(recent);
        assert_eq!(term.input().text(), "");
    }

    #[test]
    fn test_visible_lines_follow_scroll() {
        let mut term = TuiTerminal::new();
        for i in 0..10 {
            term.push_event(&OutputEvent::StdoutLine(format!("line{}\n", i)));
        }

        // Ten lines plus the open empty line.
        assert_eq!(term.visible_lines(80, 3), vec!["line8", "line9", ""]);

        term.scroll_up(2);
        assert!(term.is_scrolled());
        assert_eq!(term.visible_lines(80, 3), vec!["line6", "line7", "line8"]);

        term.scroll_up(100);
        assert_eq!(term.visible_lines(80, 3), vec!["line0", "line1", "line2"]);

        term.push_event(&OutputEvent::ExitStatus(0));
        assert!(!term.is_scrolled());
    }

    #[test]
    fn test_cursor_position_after_prompt() {
        let mut term = TuiTerminal::new();
        typed(&mut term, "ls");
        let area = Rect::new(1, 1, 40, 10);

        assert_eq!(term.cursor_position(area), (1 + 2 + 2, 10));
    }

    #[test]
    fn test_cursor_position_counts_display_columns() {
        let mut term = TuiTerminal::new();
        typed(&mut term, "日本");
        let area = Rect::new(0, 0, 40, 5);

        assert_eq!(term.cursor_position(area), (PROMPT.width() as u16 + 4, 4));
    }

    #[test]
    fn test_render_shows_prompt_and_output() {
        let mut term = TuiTerminal::new();
        term.push_event(&OutputEvent::StderrLine("bad\n".to_string()));
        typed(&mut term, "pwd");
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);

        (&term).render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
        };
        assert!(row(0).starts_with("[STDERR] bad"));
        assert!(row(2).starts_with("$ pwd"));
    }
}
