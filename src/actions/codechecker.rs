use std::io::Write;
use std::path::Path;

use crate::actions::build::{compile_database_path, ensure_compile_database_exists};
use crate::actions::runner::{CommandRunner, Invocation};

pub(crate) static REPORTS_DIR: &str = "codechecker.reports";
pub(crate) static REPORTS_HTML_DIR: &str = "codechecker.reports_html";
static SKIP_FILE: &str = ".codechecker.skip_file";

/// Analyze the compile database with CodeChecker then render the HTML report
///
/// Findings make `CodeChecker analyze` exit non-zero, so the analysis step
/// only reports its failure and the HTML step always runs.
pub(crate) fn codechecker<R: CommandRunner, W: Write>(
    build_dir: &Path,
    runner: &mut R,
    out: &mut W,
) -> eyre::Result<()> {
    ensure_compile_database_exists(build_dir, runner, out)?;

    writeln!(out, "STEP: codechecker: Analyzing ... to {REPORTS_DIR}")?;
    let analyze = Invocation::new("CodeChecker")
        .arg("analyze")
        .arg(compile_database_path(build_dir))
        .arg(format!("--output={REPORTS_DIR}"))
        .arg(format!("--skip={SKIP_FILE}"))
        .with_warn();
    if let Err(err) = runner.run(&analyze) {
        writeln!(out, "EXCEPTION: {err}")?;
    }

    writeln!(out, "{}", "_".repeat(60))?;
    writeln!(out, "STEP: codechecker: Generate HTML to: {REPORTS_HTML_DIR}")?;
    let parse = Invocation::new("CodeChecker")
        .args(["parse", "-e", "html", REPORTS_DIR, "-o", REPORTS_HTML_DIR]);
    runner.run(&parse)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::actions::runner::tests::RecordingRunner;

    #[test]
    fn test_codechecker_steps() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build.debug");
        fs::create_dir_all(&build_dir).unwrap();
        fs::write(compile_database_path(&build_dir), "[]").unwrap();

        // analyze reports findings, parse succeeds
        let mut runner = RecordingRunner::with_codes(&[2, 0]);
        let mut out = vec![];
        codechecker(&build_dir, &mut runner, &mut out).unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            format!(
                "CodeChecker analyze {} --output=codechecker.reports --skip=.codechecker.skip_file",
                compile_database_path(&build_dir).display()
            )
        );
        assert!(runner.invocations[0].warn);
        assert_eq!(
            commands[1],
            "CodeChecker parse -e html codechecker.reports -o codechecker.reports_html"
        );

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "STEP: codechecker: Analyzing ... to codechecker.reports",
                "____________________________________________________________",
                "STEP: codechecker: Generate HTML to: codechecker.reports_html",
            ]
        );
    }

    #[test]
    fn test_codechecker_parse_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let build_dir = dir.path().join("build.debug");
        fs::create_dir_all(&build_dir).unwrap();
        fs::write(compile_database_path(&build_dir), "[]").unwrap();

        let mut runner = RecordingRunner::with_codes(&[0, 1]);
        let mut out = vec![];
        assert!(codechecker(&build_dir, &mut runner, &mut out).is_err());
    }
}
