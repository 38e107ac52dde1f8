use std::fmt::Write;
use std::path::Path;

/// Troubleshooting dump printed after the matched paths in debug mode.
pub(crate) fn glob_diagnostics(
    cwd: &Path,
    args: &[String],
    pattern: &str,
    paths: &[String],
) -> String {
    let mut diag = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(diag, "DIAG: ____________________");
    let _ = writeln!(diag, "  CWD: {}", dunce::simplified(cwd).display());
    let _ = writeln!(diag, "  args[{}]: {:?};", args.len(), args);
    let _ = writeln!(diag, "  pattern: {pattern};");
    let _ = writeln!(diag, "  paths[{}]: {}", paths.len(), paths.join("\n    "));
    diag
}
