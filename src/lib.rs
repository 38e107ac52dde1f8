//! `tidy-glob` bundles two small helpers for C++ static-analysis playgrounds.
//!
//! ## path-glob
//!
//! Expands an ANT-like wildcard pattern relative to the current directory and
//! prints every match on a single line.
//!
//! ```bash
//! path-glob "**/*.cpp"
//! ```
//! Will display something like
//! ```bash
//! main.cpp src/x.cpp src/lib/y.cpp
//! ```
//!
//! - `*` matches inside one path segment, `*/file.ext` never matches `a/b/file.ext`
//! - `**/` matches zero or more directories, so `**/*.cpp` also finds `main.cpp`
//! - a trailing `/` keeps directories only
//!
//! A pattern matching nothing prints an empty line and still succeeds. Without
//! pattern the usage is printed and the exit code is 1.
//!
//! Set `DEBUG=ON` (or `DEBUG=1`, or pass `--debug`) to get a diagnostic block
//! after the matches:
//!
//! ```bash
//! DIAG: ____________________
//!   CWD: /work
//!   args[1]: ["**/*.cpp"];
//!   pattern: **/*.cpp;
//!   paths[2]: src/x.cpp
//!     src/lib/y.cpp
//! ```
//!
//! ## tidy-tasks
//!
//! Named wrappers around the analyzers, all working from the compile database
//! `build.debug/compile_commands.json`. When the database is missing, the
//! project is built first with `cmake-build`.
//!
//! ```bash
//! tidy-tasks build
//! tidy-tasks clang-tidy [SOURCE_PATH]
//! tidy-tasks run-clang-tidy -j 4
//! tidy-tasks cargo-run-clang-tidy -j 4
//! tidy-tasks codechecker
//! tidy-tasks cleanup
//! ```
//!
//! `--dry-run` prints the commands without running them.
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use cli::{Settings, GLOB_USAGE};
use expand::PatternExpander;

pub mod actions;
pub mod cli;
mod diagnostics;
pub mod expand;

/// How a successful run ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Success,
    /// Caller mistake already reported on stdout
    Exit(u8),
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Exit(code) => ExitCode::from(code),
        }
    }
}

/// Main path-glob function
///
/// `args` are the raw positional arguments, the first one is the pattern.
pub fn run_path_glob<W: Write>(
    settings: Settings,
    args: &[String],
    cwd: &Path,
    out: &mut W,
) -> eyre::Result<Outcome> {
    let Some(pattern) = args.first() else {
        writeln!(out, "{GLOB_USAGE}")?;
        return Ok(Outcome::Exit(1));
    };

    let paths = PatternExpander::new(cwd)?.expand(pattern)?;
    log::info!("{} path(s) match {pattern}", paths.len());
    writeln!(out, "{}", paths.join(" "))?;

    if settings.debug {
        write!(
            out,
            "{}",
            diagnostics::glob_diagnostics(cwd, args, pattern, &paths)
        )?;
    }

    Ok(Outcome::Success)
}
