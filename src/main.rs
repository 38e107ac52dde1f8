use std::process::ExitCode;

use clap::Parser;
use tidy_glob::cli::PathGlob;
use tidy_glob::run_path_glob;

fn run() -> eyre::Result<ExitCode> {
    let cli = PathGlob::parse();
    let cwd = std::env::current_dir()?;
    let outcome = run_path_glob(cli.settings(), cli.args(), &cwd, &mut std::io::stdout())?;
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
