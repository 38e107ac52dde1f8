use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::process::Stdio;

use colored::Colorize;
use eyre::{bail, WrapErr};

/// One external command, as a task wants it run
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub(crate) program: OsString,
    pub(crate) args: Vec<OsString>,
    /// Discard the command's stderr
    pub(crate) hide_stderr: bool,
    /// A non-zero exit is reported but not turned into an error
    pub(crate) warn: bool,
}

impl Invocation {
    pub(crate) fn new<S: Into<OsString>>(program: S) -> Self {
        Invocation {
            program: program.into(),
            args: vec![],
            hide_stderr: false,
            warn: false,
        }
    }

    pub(crate) fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn with_hidden_stderr(self) -> Self {
        Invocation {
            hide_stderr: true,
            ..self
        }
    }

    pub(crate) fn with_warn(self) -> Self {
        Invocation { warn: true, ..self }
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status of a finished command, `None` when killed by a signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completed {
    pub code: Option<i32>,
}

impl Completed {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> eyre::Result<Completed>;
}

/// Echoes then runs commands with the terminal attached
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &Invocation) -> eyre::Result<Completed> {
        println!("{}", invocation.to_string().bold());
        log::debug!("Spawn {}", invocation.program.to_string_lossy());

        let stderr = if invocation.hide_stderr {
            Stdio::null()
        } else {
            Stdio::inherit()
        };
        let status = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(stderr)
            .status()
            .wrap_err_with(|| format!("Unable to run {}", invocation.program.to_string_lossy()))?;

        let completed = Completed {
            code: status.code(),
        };
        if !completed.success() {
            if !invocation.warn {
                bail!("Command '{invocation}' failed with {status}");
            }
            log::warn!("Command '{invocation}' failed with {status}");
        }
        Ok(completed)
    }
}

/// Echoes commands without running them
#[derive(Debug, Default)]
pub struct DryRunner;

impl CommandRunner for DryRunner {
    fn run(&mut self, invocation: &Invocation) -> eyre::Result<Completed> {
        println!("{}", invocation.to_string().bold());
        Ok(Completed { code: Some(0) })
    }
}
