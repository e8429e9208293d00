//! Command-line options and the headless (non-TUI) runner.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;

use crate::shell::{FAILURE_STATUS, OutputEvent, SHELL_ENV_VAR, ShellEngine};
use crate::ui::transcript;

#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = "ctf-toolkit", version)]
#[command(about = "Interactive command runner with live output streaming")]
#[command(after_help = format!(
    "Environment:\n  {SHELL_ENV_VAR}  Shell used to run commands (default: /bin/sh)\n  RUST_LOG           Log level for the file log (default: info)"
))]
pub struct CliOptions {
    /// Directory commands run in (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Run one command without the TUI and exit with its status
    #[arg(long, short = 'c', value_name = "COMMAND")]
    pub exec: Option<String>,

    /// Print events as JSON lines (requires --exec)
    #[arg(long, requires = "exec")]
    pub json: bool,
}

impl CliOptions {
    /// Engine configured from the environment and these options.
    pub fn engine(&self) -> ShellEngine {
        let mut engine = ShellEngine::new();
        if let Some(cwd) = &self.cwd {
            engine.set_cwd(cwd.clone());
        }
        tracing::debug!(shell = %engine.config().program, cwd = %engine.cwd().display(), "engine configured");
        engine
    }
}

/// Run `command` once, writing every event to `out`.
///
/// Returns the command's exit status. A blank command prints nothing and
/// counts as success.
pub async fn run_headless<W: Write>(
    engine: &mut ShellEngine,
    command: &str,
    json: bool,
    out: &mut W,
) -> Result<i32> {
    let mut status = 0;
    let mut events = engine.execute(command);

    while let Some(event) = events.next().await {
        if json {
            serde_json::to_writer(&mut *out, &event)?;
            writeln!(out)?;
        } else {
            write!(out, "{}", transcript::format_event(&event))?;
        }
        out.flush()?;

        if let OutputEvent::ExitStatus(code) = event {
            status = code;
        }
    }
    Ok(status)
}

/// Map an exit status onto a process exit code.
pub fn exit_code(status: i32) -> u8 {
    u8::try_from(status).unwrap_or(FAILURE_STATUS as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliOptions, clap::Error> {
        CliOptions::try_parse_from(std::iter::once("ctf-toolkit").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_parse_all_options() {
        let options = parse(&["--cwd", "/tmp", "--exec", "ls -la", "--json"]).unwrap();
        assert_eq!(options.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(options.exec.as_deref(), Some("ls -la"));
        assert!(options.json);

        let short = parse(&["-c", "id"]).unwrap();
        assert_eq!(short.exec.as_deref(), Some("id"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--cwd"]).is_err());
        assert!(parse(&["--exec"]).is_err());

        let err = parse(&["--json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_mentions_shell_override() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains(SHELL_ENV_VAR));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        CliOptions::command().debug_assert();
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(127), 127);
        assert_eq!(exit_code(-1), 1);
        assert_eq!(exit_code(300), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_headless_text_output() {
        let mut engine = ShellEngine::with_config(Default::default(), "/");
        let mut out = Vec::new();

        let status = run_headless(&mut engine, "echo hi; echo no >&2; exit 4", false, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(status, 4);
        assert!(text.contains("hi\n"));
        assert!(text.contains("[STDERR] no\n"));
        assert!(text.ends_with("[Exit Code: 4]\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_headless_json_lines() {
        let mut engine = ShellEngine::with_config(Default::default(), "/");
        let mut out = Vec::new();

        let status = run_headless(&mut engine, "printf 'a\\n'", true, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(status, 0);
        assert_eq!(
            lines,
            vec![
                r#"{"type":"stdout","data":"a\n"}"#,
                r#"{"type":"exit_status","data":0}"#,
            ]
        );
    }

    #[tokio::test]
    async fn test_headless_blank_command() {
        let mut engine = ShellEngine::with_config(Default::default(), "/");
        let mut out = Vec::new();

        let status = run_headless(&mut engine, "  ", false, &mut out).await.unwrap();

        assert_eq!(status, 0);
        assert!(out.is_empty());
        assert!(engine.history().is_empty());
    }
}
