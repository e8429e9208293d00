//! Main entry point for ctf-toolkit.
//!
//! Parses options, initializes logging, then either runs a single command
//! headless or starts the interactive terminal and restores the screen on
//! exit.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use ctf_toolkit::app::App;
use ctf_toolkit::cli::{self, CliOptions};
use ctf_toolkit::utils;
use ctf_toolkit::utils::guard::OnDrop;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let options = CliOptions::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = utils::logger::init_logging();

    let mut engine = options.engine();

    if let Some(command) = &options.exec {
        let mut stdout = std::io::stdout().lock();
        let status = cli::run_headless(&mut engine, command, options.json, &mut stdout).await?;
        return Ok(ExitCode::from(cli::exit_code(status)));
    }

    let mut terminal = ratatui::init();
    let _restore = OnDrop::new(ratatui::restore);

    let mut app = App::new(engine);
    app.draw(&mut terminal)?;
    app.run(&mut terminal).await?;
    Ok(ExitCode::SUCCESS)
}
