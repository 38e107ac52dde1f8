use std::io::Write;
use std::path::{Path, PathBuf};

use crate::actions::codechecker::{REPORTS_DIR, REPORTS_HTML_DIR};

/// Build and report directories produced by the other tasks
pub(crate) fn cleanup_targets(build_dir: &Path) -> Vec<PathBuf> {
    vec![
        build_dir.to_path_buf(),
        PathBuf::from(REPORTS_DIR),
        PathBuf::from(REPORTS_HTML_DIR),
    ]
}

/// Remove generated directories under `root`, only listing them in dry run
pub(crate) fn cleanup<W: Write>(
    root: &Path,
    build_dir: &Path,
    dry_run: bool,
    out: &mut W,
) -> eyre::Result<()> {
    for target in cleanup_targets(build_dir) {
        let path = root.join(&target);
        if !path.exists() {
            log::trace!("Nothing to remove at {}", target.display());
            continue;
        }

        let entries = walkdir::WalkDir::new(&path)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .count();
        writeln!(out, "REMOVE: {} ({entries} entries)", target.display())?;

        if !dry_run {
            log::debug!("Remove {}", dunce::simplified(&path).display());
            std::fs::remove_dir_all(&path)?;
        }
    }
    Ok(())
}
