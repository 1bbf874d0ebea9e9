use std::io;
use std::process::ExitCode;

use blkmv::app::sink::ShellSink;
use blkmv::cli::Cli;
use blkmv::infra::editor::CommandEditor;
use blkmv::infra::fs::RealFileSystem;
use blkmv::{Pipeline, RunError, RunOutcome};
use clap::Parser;
use tracing::{error, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.log_level())
        .with_target(false)
        .without_time()
        .init();

    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, RunError> {
    let editor = CommandEditor::from_command(&cli.editor_command())?;
    let config = cli.run_config();
    let mut sink = ShellSink::new(io::stdout().lock());

    match Pipeline::new(&config, &editor, &RealFileSystem).run(&mut sink)? {
        RunOutcome::NothingToDo => {
            warn!("nothing to do in `{}`", config.root.display());

            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Completed(report) if report.is_clean() => Ok(ExitCode::SUCCESS),
        RunOutcome::Completed(report) => {
            error!("{} operation(s) failed", report.failures.len());

            Ok(ExitCode::FAILURE)
        }
    }
}
