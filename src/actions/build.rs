use std::io::Write;
use std::path::{Path, PathBuf};

use crate::actions::runner::{CommandRunner, Invocation};

static COMPILE_COMMANDS_FILE: &str = "compile_commands.json";
static BUILD_COMMAND: &str = "cmake-build";

pub(crate) fn compile_database_path(build_dir: &Path) -> PathBuf {
    build_dir.join(COMPILE_COMMANDS_FILE)
}

/// Build the project, which also generates the compile database
pub(crate) fn build<R: CommandRunner>(runner: &mut R) -> eyre::Result<()> {
    log::info!("Build project");
    runner.run(&Invocation::new(BUILD_COMMAND))?;
    Ok(())
}

/// Analyzers need compile_commands.json, build first when it is missing
pub(crate) fn ensure_compile_database_exists<R: CommandRunner, W: Write>(
    build_dir: &Path,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<()> {
    let compile_database = compile_database_path(build_dir);
    if compile_database.exists() {
        log::debug!(
            "Compile database found at {}",
            dunce::simplified(&compile_database).display()
        );
        return Ok(());
    }

    writeln!(out, "NEEDS: build")?;
    build(runner)
}
