//! Per-invocation state machine merging both pumps into one event sequence.
//!
//! Lines are taken round-robin while both buffers hold data. When both are
//! empty the invocation waits on whichever pumps are still running. Once
//! both pumps are done and drained, the child is reaped and a single
//! `ExitStatus` closes the sequence.

use std::path::PathBuf;

use tokio::io::AsyncRead;
use tokio::process::Child;
use tokio::sync::mpsc::{self, UnboundedReceiver, error::TryRecvError};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::error::ExecError;
use super::event::{FAILURE_STATUS, OutputEvent};
use super::launcher::{self, ShellConfig};
use super::pump::{self, StreamKind};

/// Everything needed to start the child on first pull.
pub(crate) struct LaunchRequest {
    pub config: ShellConfig,
    pub command: String,
    pub cwd: PathBuf,
}

/// FIFO buffer fed by one pump.
struct LineBuffer {
    kind: StreamKind,
    rx: UnboundedReceiver<String>,
    done: bool,
}

impl LineBuffer {
    fn new(kind: StreamKind, rx: UnboundedReceiver<String>) -> Self {
        Self { kind, rx, done: false }
    }

    /// Take a line if one is queued right now.
    fn try_pop(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                None
            }
        }
    }

    /// Wait for the next line, or for the pump to finish.
    async fn pop(&mut self) -> Option<String> {
        let line = self.rx.recv().await;
        if line.is_none() {
            self.done = true;
        }
        line
    }

    fn event(&self, line: String) -> OutputEvent {
        match self.kind {
            StreamKind::Stdout => OutputEvent::StdoutLine(line),
            StreamKind::Stderr => OutputEvent::StderrLine(line),
        }
    }
}

/// A spawned child and its two pumps.
struct Running {
    child: Child,
    stdout: LineBuffer,
    stderr: LineBuffer,
    pumps: JoinSet<Result<usize, ExecError>>,
    /// Stream that gets the first look on the next iteration.
    turn: StreamKind,
}

impl Running {
    fn start(request: &LaunchRequest) -> Result<Self, ExecError> {
        let launched = launcher::launch(&request.config, &request.command, &request.cwd)?;
        Ok(Self::with_pipes(launched.child, launched.stdout, launched.stderr))
    }

    /// Start one pump per pipe for an already spawned `child`.
    fn with_pipes<O, E>(child: Child, stdout: O, stderr: E) -> Self
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        let (stdout_tx, stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, stderr_rx) = mpsc::unbounded_channel();

        let mut pumps = JoinSet::new();
        pumps.spawn(pump::pump_lines(StreamKind::Stdout, stdout, stdout_tx));
        pumps.spawn(pump::pump_lines(StreamKind::Stderr, stderr, stderr_tx));

        Self {
            child,
            stdout: LineBuffer::new(StreamKind::Stdout, stdout_rx),
            stderr: LineBuffer::new(StreamKind::Stderr, stderr_rx),
            pumps,
            turn: StreamKind::Stdout,
        }
    }

    fn buffer_mut(&mut self, kind: StreamKind) -> &mut LineBuffer {
        match kind {
            StreamKind::Stdout => &mut self.stdout,
            StreamKind::Stderr => &mut self.stderr,
        }
    }

    /// Next line event, or `None` once both pumps are done and drained.
    async fn next_line(&mut self) -> Option<OutputEvent> {
        for kind in [self.turn, self.turn.other()] {
            let buffer = self.buffer_mut(kind);
            if let Some(line) = buffer.try_pop() {
                let event = buffer.event(line);
                self.turn = kind.other();
                return Some(event);
            }
        }

        let Self { stdout, stderr, turn, .. } = self;
        loop {
            tokio::select! {
                line = stdout.pop(), if !stdout.done => {
                    if let Some(line) = line {
                        *turn = StreamKind::Stderr;
                        return Some(stdout.event(line));
                    }
                }
                line = stderr.pop(), if !stderr.done => {
                    if let Some(line) = line {
                        *turn = StreamKind::Stdout;
                        return Some(stderr.event(line));
                    }
                }
                else => return None,
            }
        }
    }

    /// Join both pumps, then reap the child.
    async fn finish(&mut self) -> Result<i32, ExecError> {
        while let Some(joined) = self.pumps.join_next().await {
            let pumped = joined.map_err(|e| {
                ExecError::runtime("output pump aborted", std::io::Error::other(e))
            })?;
            pumped?;
        }

        let status = self
            .child
            .wait()
            .await
            .map_err(|e| ExecError::runtime("failed to wait for child", e))?;
        // Signal-terminated children have no code.
        Ok(status.code().unwrap_or(0))
    }
}

enum Phase {
    Pending(LaunchRequest),
    Streaming(Box<Running>),
    Failed(String),
    Exiting(i32),
    Done,
}

/// Pull-driven event source for one invocation.
///
/// Dropping it at any point kills the child and aborts both pumps.
pub(crate) struct Invocation {
    phase: Phase,
}

impl Invocation {
    pub fn new(request: LaunchRequest) -> Self {
        Self {
            phase: Phase::Pending(request),
        }
    }

    pub async fn next_event(&mut self) -> Option<OutputEvent> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return None,
                Phase::Pending(request) => {
                    self.phase = match Running::start(&request) {
                        Ok(running) => Phase::Streaming(Box::new(running)),
                        Err(e) => fail(e),
                    };
                }
                Phase::Streaming(mut running) => {
                    if let Some(event) = running.next_line().await {
                        self.phase = Phase::Streaming(running);
                        return Some(event);
                    }
                    match running.finish().await {
                        Ok(code) => {
                            debug!(code, "command exited");
                            return Some(OutputEvent::ExitStatus(code));
                        }
                        Err(e) => self.phase = fail(e),
                    }
                }
                Phase::Failed(message) => {
                    self.phase = Phase::Exiting(FAILURE_STATUS);
                    return Some(OutputEvent::LaunchError(message));
                }
                Phase::Exiting(code) => return Some(OutputEvent::ExitStatus(code)),
            }
        }
    }
}

fn fail(err: ExecError) -> Phase {
    warn!(error = %err, "command failed");
    Phase::Failed(err.to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::pump::testing::FailAfter;
    use pretty_assertions::assert_eq;

    fn exited_child() -> Child {
        tokio::process::Command::new("/bin/sh")
            .arg("-c")
            .arg("exit 0")
            .spawn()
            .unwrap()
    }

    async fn drain(invocation: &mut Invocation) -> Vec<OutputEvent> {
        let mut events = Vec::new();
        while let Some(event) = invocation.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_read_failure_ends_with_failure_status() {
        let running = Running::with_pipes(exited_child(), FailAfter::new(b"partial\n"), &b"warn\n"[..]);
        let mut invocation = Invocation {
            phase: Phase::Streaming(Box::new(running)),
        };

        let events = drain(&mut invocation).await;

        assert_eq!(events.len(), 4, "events: {:?}", events);
        assert!(events.contains(&OutputEvent::StdoutLine("partial\n".to_string())));
        assert!(events.contains(&OutputEvent::StderrLine("warn\n".to_string())));
        match &events[2] {
            OutputEvent::LaunchError(message) => assert!(message.contains("failed to read stdout")),
            other => panic!("expected launch error, got {:?}", other),
        }
        assert_eq!(events[3], OutputEvent::ExitStatus(FAILURE_STATUS));
        assert_eq!(invocation.next_event().await, None);
    }

    #[tokio::test]
    async fn test_clean_pipes_report_child_status() {
        let running = Running::with_pipes(exited_child(), &b"one\n"[..], &b""[..]);
        let mut invocation = Invocation {
            phase: Phase::Streaming(Box::new(running)),
        };

        let events = drain(&mut invocation).await;

        assert_eq!(
            events,
            vec![
                OutputEvent::StdoutLine("one\n".to_string()),
                OutputEvent::ExitStatus(0),
            ]
        );
    }
}
