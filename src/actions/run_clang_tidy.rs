use std::io::Write;
use std::path::{Path, PathBuf};

use eyre::eyre;

use crate::actions::build::ensure_compile_database_exists;
use crate::actions::runner::{CommandRunner, Invocation};

static CARGO_RUN_CLANG_TIDY_CONFIG: &str = ".clang-tidy.json";

/// Use LLVM's run-clang-tidy on every entry of the compile database
///
/// Never fails on analyzer findings: the result is reported as PASSED/FAILED.
pub(crate) fn run_clang_tidy<R: CommandRunner, W: Write>(
    build_dir: &Path,
    jobs: usize,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<()> {
    ensure_compile_database_exists(build_dir, runner, out)?;

    let invocation = Invocation::new("run-clang-tidy")
        .arg("-p")
        .arg(build_dir)
        .arg("-j")
        .arg(jobs.to_string())
        .with_hidden_stderr();

    match runner.run(&invocation) {
        Ok(_) => writeln!(out, "PASSED")?,
        Err(err) => writeln!(out, "FAILED: {err}")?,
    }
    Ok(())
}

/// Location of the cargo-installed run-clang-tidy, `$HOME/.cargo/bin/run-clang-tidy`
pub(crate) fn cargo_run_clang_tidy_program() -> eyre::Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or(eyre!("HOME is not set"))?;
    Ok(PathBuf::from(home)
        .join(".cargo")
        .join("bin")
        .join("run-clang-tidy"))
}

pub(crate) fn cargo_run_clang_tidy<R: CommandRunner, W: Write>(
    program: &Path,
    build_dir: &Path,
    jobs: usize,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<()> {
    ensure_compile_database_exists(build_dir, runner, out)?;

    let invocation = Invocation::new(program)
        .arg(CARGO_RUN_CLANG_TIDY_CONFIG)
        .arg("-j")
        .arg(jobs.to_string());
    runner.run(&invocation)?;
    Ok(())
}
