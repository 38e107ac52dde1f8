use std::io::Write;
use std::path::{Path, PathBuf};

use eyre::eyre;

use crate::actions::build::ensure_compile_database_exists;
use crate::actions::runner::{CommandRunner, Invocation};
use crate::cli::ClangTidy;
use crate::expand::PatternExpander;
use crate::Outcome;

pub(crate) static DEFAULT_SOURCES: &str = "false-negative/*.cpp";

/// Where the sources handed to clang-tidy come from
#[derive(Debug, PartialEq)]
pub(crate) enum Sources {
    /// Pattern expanded in `dir`, or in the working directory when `None`
    Pattern {
        dir: Option<PathBuf>,
        pattern: String,
    },
    File(PathBuf),
    Missing(PathBuf),
}

pub(crate) fn resolve_sources(source_path: Option<&Path>, extension: &str) -> Sources {
    let source_path = match source_path {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => {
            return Sources::Pattern {
                dir: None,
                pattern: DEFAULT_SOURCES.to_string(),
            }
        }
    };

    if source_path.is_dir() {
        Sources::Pattern {
            dir: Some(source_path.to_path_buf()),
            pattern: format!("*.{extension}"),
        }
    } else if source_path.exists() {
        Sources::File(source_path.to_path_buf())
    } else {
        Sources::Missing(source_path.to_path_buf())
    }
}

pub(crate) fn collect_sources(sources: &Sources) -> eyre::Result<Vec<PathBuf>> {
    match sources {
        Sources::Pattern { dir: None, pattern } => Ok(crate::expand::expand(pattern)?
            .into_iter()
            .map(PathBuf::from)
            .collect()),
        Sources::Pattern {
            dir: Some(dir),
            pattern,
        } => Ok(PatternExpander::new(dir)?
            .expand(pattern)?
            .into_iter()
            .map(|path| dir.join(path))
            .collect()),
        Sources::File(path) => Ok(vec![path.clone()]),
        Sources::Missing(path) => Err(eyre!("FileNotFoundError: {}", path.display())),
    }
}

/// Run clang-tidy on a source file, a source directory or the default sources
pub(crate) fn clang_tidy<R: CommandRunner, W: Write>(
    args: &ClangTidy,
    build_dir: &Path,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<Outcome> {
    ensure_compile_database_exists(build_dir, runner, out)?;

    let sources = resolve_sources(args.source_path.as_deref(), &args.extension);
    if let Sources::Missing(path) = &sources {
        writeln!(out, "FileNotFoundError: {}", path.display())?;
        return Ok(Outcome::Exit(2));
    }

    let paths = collect_sources(&sources)?;
    if paths.is_empty() {
        writeln!(out, "WARNING: no sources match {sources}")?;
        return Ok(Outcome::Success);
    }
    log::info!("Run clang-tidy on {} source(s)", paths.len());

    let invocation = Invocation::new("clang-tidy")
        .arg("-p")
        .arg(build_dir)
        .args(paths);
    runner.run(&invocation)?;

    Ok(Outcome::Success)
}

impl std::fmt::Display for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sources::Pattern { dir: None, pattern } => write!(f, "{pattern}"),
            Sources::Pattern {
                dir: Some(dir),
                pattern,
            } => write!(f, "{}", dir.join(pattern).display()),
            Sources::File(path) | Sources::Missing(path) => write!(f, "{}", path.display()),
        }
    }
}
