//! Line pumps: move decoded lines from a child pipe into a FIFO buffer.
//!
//! A pump never pushes a sentinel. It finishes by dropping its sender, which
//! the multiplexer observes as the buffer's done flag.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::error::ExecError;

/// Which pipe a pump is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn name(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }

    pub fn other(self) -> Self {
        match self {
            StreamKind::Stdout => StreamKind::Stderr,
            StreamKind::Stderr => StreamKind::Stdout,
        }
    }
}

/// Decode one raw line, replacing invalid UTF-8 with U+FFFD.
pub(crate) fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read `reader` line by line until EOF, pushing each line into `buffer`.
///
/// Lines keep their `\n` terminator; a final unterminated line is pushed as
/// is. Returns the number of lines pushed. Stops early, without error, when
/// the receiving side is gone.
pub(crate) async fn pump_lines<R>(
    kind: StreamKind,
    reader: R,
    buffer: UnboundedSender<String>,
) -> Result<usize, ExecError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut raw = Vec::new();
    let mut count = 0usize;

    loop {
        raw.clear();
        let n = reader
            .read_until(b'\n', &mut raw)
            .await
            .map_err(|e| ExecError::runtime(format!("failed to read {}", kind.name()), e))?;
        if n == 0 {
            break;
        }
        if buffer.send(decode_line(&raw)).is_err() {
            debug!(stream = kind.name(), "buffer receiver dropped, stopping pump");
            break;
        }
        count += 1;
    }

    debug!(stream = kind.name(), lines = count, "pump finished");
    Ok(count)
}
