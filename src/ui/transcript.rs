//! Text rendering of invocation events for display.
//!
//! Standard output is shown verbatim, everything else is tagged so the
//! reader can tell streams and failures apart.

use crate::shell::OutputEvent;

/// Text shown when a command is submitted.
pub fn format_submitted(command: &str) -> String {
    format!("\n{}\n[Executing...]\n", command)
}

/// Text shown for one event.
pub fn format_event(event: &OutputEvent) -> String {
    match event {
        OutputEvent::StdoutLine(line) => line.clone(),
        OutputEvent::StderrLine(line) => format!("[STDERR] {}", line),
        OutputEvent::LaunchError(message) => format!("[ERROR] {}\n", message),
        OutputEvent::ExitStatus(code) => format!("[Exit Code: {}]\n", code),
    }
}

/// Oldest lines are dropped past this many.
pub const MAX_SCROLLBACK_LINES: usize = 10_000;

/// Scrollback of logical lines; the last one is still open for appends.
#[derive(Debug, Clone)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Append raw text, splitting on newlines.
    pub fn push_str(&mut self, text: &str) {
        let clean = sanitize(text);
        for (i, part) in clean.split('\n').enumerate() {
            if i == 0 {
                if let Some(open) = self.lines.last_mut() {
                    open.push_str(part);
                    continue;
                }
            }
            self.lines.push(part.to_string());
        }

        if self.lines.len() > MAX_SCROLLBACK_LINES {
            let excess = self.lines.len() - MAX_SCROLLBACK_LINES;
            self.lines.drain(..excess);
        }
    }

    pub fn push_event(&mut self, event: &OutputEvent) {
        self.push_str(&format_event(event));
    }

    pub fn push_submitted(&mut self, command: &str) {
        self.push_str(&format_submitted(command));
    }

    /// Logical lines, including the open last line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines wrapped to `width` display columns.
    pub fn wrapped(&self, width: usize) -> Vec<String> {
        let width = width.max(1);
        let mut out = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.is_empty() {
                out.push(String::new());
                continue;
            }
            out.extend(textwrap::wrap(line, width).into_iter().map(|l| l.into_owned()));
        }
        out
    }
}

/// Make command output safe to draw: strip ANSI sequences and carriage
/// returns, expand tabs.
fn sanitize(text: &str) -> String {
    strip_ansi_codes(text).replace('\r', "").replace('\t', "    ")
}

/// Strip ANSI escape codes (CSI and OSC sequences) from text.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            result.push(ch);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // CSI ends at the first letter
                for next_ch in chars.by_ref() {
                    if next_ch.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                // OSC ends at BEL or ST (ESC \)
                while let Some(next_ch) = chars.next() {
                    if next_ch == '\x07' {
                        break;
                    }
                    if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    result
}
