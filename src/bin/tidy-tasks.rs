use std::process::ExitCode;

use clap::Parser;
use tidy_glob::actions::run_task;
use tidy_glob::actions::runner::{DryRunner, ShellRunner};
use tidy_glob::cli::TidyTasks;

fn run() -> eyre::Result<ExitCode> {
    let cli = TidyTasks::parse();
    let mut out = std::io::stdout();
    let outcome = if cli.dry_run() {
        log::info!("Run tasks in dry run");
        run_task(&cli, &mut DryRunner, &mut out)?
    } else {
        run_task(&cli, &mut ShellRunner, &mut out)?
    };
    Ok(outcome.into())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(report) => {
            eprintln!("Error: {report:?}");
            ExitCode::from(2)
        }
    }
}
