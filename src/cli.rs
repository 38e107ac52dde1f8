use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub const GLOB_USAGE: &str = "USAGE: path-glob FILE_PATTERN";

/// `DEBUG=ON` and `DEBUG=1` switch diagnostics on, anything else leaves them off
fn parse_switch(value: &str) -> Result<bool, Infallible> {
    Ok(matches!(value, "ON" | "1"))
}

/// Expand an ANT-style wildcard pattern and print the matches on one line
#[derive(Parser, Debug)]
#[command(name = "path-glob", version)]
pub struct PathGlob {
    /// Pattern to expand, e.g. "**/*.cpp"; further arguments are ignored.
    /// Put `--` before a pattern that starts with `-`
    #[arg(name = "FILE_PATTERN", allow_hyphen_values = true, trailing_var_arg = true)]
    pub(crate) args: Vec<String>,
    /// Print diagnostics after the matched paths
    #[arg(
        long,
        env = "DEBUG",
        action = ArgAction::Set,
        value_parser = parse_switch,
        num_args = 0..=1,
        require_equals = true,
        default_value = "OFF",
        default_missing_value = "ON",
        hide_env_values = true
    )]
    pub(crate) debug: bool,
}

/// Settings read once at startup and handed to the entry point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Settings {
    pub debug: bool,
}

impl PathGlob {
    pub fn settings(&self) -> Settings {
        Settings { debug: self.debug }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[derive(Parser, Debug)]
#[command(name = "tidy-tasks", version)]
pub struct TidyTasks {
    /// Build directory holding compile_commands.json
    #[arg(long, global = true, default_value = "build.debug")]
    pub(crate) build_dir: PathBuf,
    /// Print the commands instead of running them
    #[arg(long, global = true, action, default_value = "false")]
    pub(crate) dry_run: bool,
    #[command(subcommand)]
    pub(crate) task: Task,
}

impl TidyTasks {
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Task {
    /// Build the project (and: compile_commands.json)
    Build,
    /// Run clang-tidy on a source-file or source-directory
    ClangTidy(ClangTidy),
    /// Use run-clang-tidy to run clang-tidy on sources
    RunClangTidy(Jobs),
    /// Use the cargo-installed run-clang-tidy driven by .clang-tidy.json
    CargoRunClangTidy(Jobs),
    /// Run CodeChecker and render its HTML report
    Codechecker,
    /// Remove the build directory and CodeChecker reports
    Cleanup,
}

#[derive(clap::Args, Debug)]
pub struct ClangTidy {
    /// Source file or directory to analyze
    #[arg(name = "SOURCE_PATH")]
    pub(crate) source_path: Option<PathBuf>,
    /// Extension of the sources picked from a directory
    #[arg(long, default_value = "cpp")]
    pub(crate) extension: String,
}

#[derive(clap::Args, Debug)]
pub struct Jobs {
    /// Number of parallel clang-tidy jobs
    #[arg(short, long, default_value_t = 1)]
    pub(crate) jobs: usize,
}
