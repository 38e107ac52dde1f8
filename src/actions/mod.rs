use std::io::Write;

use crate::cli::{Task, TidyTasks};
use crate::Outcome;

use runner::CommandRunner;

pub(crate) mod build;
pub(crate) mod clang_tidy;
pub(crate) mod cleanup;
pub(crate) mod codechecker;
pub(crate) mod run_clang_tidy;
pub mod runner;

/// Dispatch one task, running its external commands through `runner`
pub fn run_task<R: CommandRunner, W: Write>(
    cli: &TidyTasks,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<Outcome> {
    let build_dir = cli.build_dir.as_path();
    log::debug!("Run task {:?} with build dir {}", cli.task, build_dir.display());

    match &cli.task {
        Task::Build => build::build(runner)?,
        Task::ClangTidy(args) => return clang_tidy::clang_tidy(args, build_dir, runner, out),
        Task::RunClangTidy(jobs) => {
            run_clang_tidy::run_clang_tidy(build_dir, jobs.jobs, runner, out)?
        }
        Task::CargoRunClangTidy(jobs) => {
            let program = run_clang_tidy::cargo_run_clang_tidy_program()?;
            run_clang_tidy::cargo_run_clang_tidy(&program, build_dir, jobs.jobs, runner, out)?
        }
        Task::Codechecker => codechecker::codechecker(build_dir, runner, out)?,
        Task::Cleanup => {
            let root = std::env::current_dir()?;
            cleanup::cleanup(&root, build_dir, cli.dry_run, out)?
        }
    }

    Ok(Outcome::Success)
}
