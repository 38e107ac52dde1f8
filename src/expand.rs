use std::borrow::Cow;
use std::path::{Path, PathBuf};

use eyre::{bail, WrapErr};

const WILDCARDS: [char; 4] = ['*', '?', '[', '{'];

/// Expands ANT-style wildcard patterns (`*.txt`, `src/**/*.cpp`) into the
/// entries currently present under a base directory.
#[derive(Debug, Clone)]
pub struct PatternExpander {
    base: PathBuf,
}

impl PatternExpander {
    pub fn new<P: AsRef<Path>>(base: P) -> eyre::Result<Self> {
        let base = base.as_ref();
        let base = dunce::canonicalize(base)
            .wrap_err_with(|| format!("Unable to resolve base directory {}", base.display()))?;
        Ok(PatternExpander { base })
    }

    /// Expander rooted at the process working directory
    pub fn current_dir() -> eyre::Result<Self> {
        let cwd = std::env::current_dir().wrap_err("Unable to get current directory")?;
        Self::new(cwd)
    }

    /// Returns every existing entry matching `pattern`, relative to the base.
    ///
    /// `*` stays inside one path segment, `**/` spans zero or more segments
    /// and a trailing `/` only keeps directories. Leading `../` segments move
    /// the search up and are kept in the returned paths. A backslash escapes
    /// the next character. Nothing matching is an empty result, not an error.
    /// Symlinked directories are followed, subtrees that cannot be read are
    /// skipped.
    pub fn expand(&self, pattern: &str) -> eyre::Result<Vec<String>> {
        let pattern = normalize_pattern(pattern)?;

        if !has_wildcard(pattern) {
            log::trace!("Literal pattern {pattern}");
            let exists = self.base.join(pattern).symlink_metadata().is_ok();
            return Ok(if exists {
                vec![pattern.to_string()]
            } else {
                vec![]
            });
        }

        let (parents, pattern) = split_parent_segments(pattern)?;
        let mut root = self.base.clone();
        let mut prefix = PathBuf::new();
        for _ in 0..parents {
            root.push("..");
            prefix.push("..");
        }
        let root = dunce::canonicalize(&root)
            .wrap_err_with(|| format!("Unable to resolve {}", root.display()))?;

        log::debug!(
            "Expand {pattern} in {}",
            dunce::simplified(&root).display()
        );

        // A leading slash anchors the glob at the root, otherwise a pattern
        // without separator would match at any depth.
        let anchored = format!("/{}", escape_trailing_space(pattern));
        let walker = globwalk::GlobWalkerBuilder::from_patterns(&root, &[anchored])
            .min_depth(1)
            .follow_links(true)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .build()
            .wrap_err_with(|| format!("Invalid pattern {pattern:?}"))?;

        let mut paths = vec![];
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("Skip unreadable entry: {err}");
                    continue;
                }
            };
            let relative_path = prefix.join(entry.path().strip_prefix(&root)?);
            log::trace!("-> Matched {}", relative_path.display());
            paths.push(relative_path.to_string_lossy().into_owned());
        }

        Ok(paths)
    }
}

/// Expand `pattern` against the current working directory
pub fn expand(pattern: &str) -> eyre::Result<Vec<String>> {
    PatternExpander::current_dir()?.expand(pattern)
}

pub fn expand_in<P: AsRef<Path>>(base: P, pattern: &str) -> eyre::Result<Vec<String>> {
    PatternExpander::new(base)?.expand(pattern)
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

fn normalize_pattern(pattern: &str) -> eyre::Result<&str> {
    if pattern.is_empty() {
        bail!("Empty pattern");
    }

    let path = Path::new(pattern);
    if path.is_absolute() || path.has_root() {
        bail!("Non-relative patterns are unsupported: {pattern}");
    }

    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest.trim_start_matches('/');
    }
    if pattern.is_empty() {
        bail!("Empty pattern");
    }

    Ok(pattern)
}

/// Count leading `../` segments, `..` is refused anywhere else
fn split_parent_segments(pattern: &str) -> eyre::Result<(usize, &str)> {
    let mut parents = 0;
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("../") {
        parents += 1;
        rest = stripped.trim_start_matches('/');
    }
    if rest.is_empty() || rest.split('/').any(|segment| segment == "..") {
        bail!("Parent segments are only supported at the start of a pattern: {pattern}");
    }
    Ok((parents, rest))
}

/// The glob syntax trims trailing spaces unless the last one is escaped
fn escape_trailing_space(pattern: &str) -> Cow<'_, str> {
    match pattern.strip_suffix(' ') {
        Some(rest) => Cow::Owned(format!("{rest}\\ ")),
        None => Cow::Borrowed(pattern),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn sorted(mut paths: Vec<String>) -> Vec<String> {
        paths.sort();
        paths
    }

    fn native(path: &str) -> String {
        Path::new(path)
            .components()
            .collect::<std::path::PathBuf>()
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_single_segment_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "c.md");
        touch(dir.path(), "sub/d.txt");

        let paths = expand_in(dir.path(), "*.txt").unwrap();
        assert_eq!(sorted(paths), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_recursive_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/x.cpp");
        touch(dir.path(), "src/lib/y.cpp");
        touch(dir.path(), "src/lib/y.hpp");

        let expander = PatternExpander::new(dir.path()).unwrap();
        let paths = expander.expand("**/*.cpp").unwrap();
        assert_eq!(
            sorted(paths),
            vec![native("src/lib/y.cpp"), native("src/x.cpp")]
        );
    }

    #[test]
    fn test_recursive_wildcard_matches_depth_zero() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.cpp");
        touch(dir.path(), "deep/er/low.cpp");

        let expander = PatternExpander::new(dir.path()).unwrap();
        let paths = expander.expand("**/*.cpp").unwrap();
        assert_eq!(
            sorted(paths),
            vec![native("deep/er/low.cpp"), "top.cpp".to_string()]
        );
    }

    #[test]
    fn test_recursive_wildcard_between_segments() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main.cpp");
        touch(dir.path(), "src/a/b/util.cpp");
        touch(dir.path(), "other/skip.cpp");

        let expander = PatternExpander::new(dir.path()).unwrap();
        let paths = expander.expand("src/**/*.cpp").unwrap();
        assert_eq!(
            sorted(paths),
            vec![native("src/a/b/util.cpp"), native("src/main.cpp")]
        );
    }

    #[test]
    fn test_wildcard_does_not_cross_separator() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/b/file.ext");
        touch(dir.path(), "c/file.ext");

        let expander = PatternExpander::new(dir.path()).unwrap();
        let paths = expander.expand("*/file.ext").unwrap();
        assert_eq!(paths, vec![native("c/file.ext")]);
    }

    #[test]
    fn test_literal_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main.cpp");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert_eq!(expander.expand("src/main.cpp").unwrap(), vec!["src/main.cpp"]);
        assert_eq!(expander.expand("src").unwrap(), vec!["src"]);
        assert!(expander.expand("src/missing.cpp").unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert!(expander.expand("nonexistent/*.xyz").unwrap().is_empty());
        assert!(expander.expand("**/*.xyz").unwrap().is_empty());
    }

    #[test]
    fn test_matches_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "alpha/file.txt");
        touch(dir.path(), "beta/file.txt");
        touch(dir.path(), "gamma.txt");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert_eq!(
            sorted(expander.expand("*").unwrap()),
            vec!["alpha", "beta", "gamma.txt"]
        );
        assert_eq!(
            sorted(expander.expand("*/").unwrap()),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn test_leading_current_dir_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert_eq!(expander.expand("./*.txt").unwrap(), vec!["a.txt"]);
        assert_eq!(expander.expand("./a.txt").unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn test_rejected_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let expander = PatternExpander::new(dir.path()).unwrap();

        assert!(expander.expand("").is_err());
        assert!(expander.expand("./").is_err());
        assert!(expander.expand("/etc/*.conf").is_err());
        assert!(expander.expand("[a-").is_err());
        assert!(expander.expand("src/../*.txt").is_err());
        assert!(expander.expand("../*/../*.txt").is_err());
    }

    #[test]
    fn test_leading_parent_segments() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "top.txt");
        touch(dir.path(), "other.md");
        touch(dir.path(), "real/inner.txt");

        let expander = PatternExpander::new(dir.path().join("real")).unwrap();
        assert_eq!(expander.expand("../*.txt").unwrap(), vec![native("../top.txt")]);
        assert_eq!(expander.expand("../top.txt").unwrap(), vec!["../top.txt"]);
        assert_eq!(
            expander.expand("../real/*.txt").unwrap(),
            vec![native("../real/inner.txt")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_symlinked_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "real/file.txt");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert_eq!(expander.expand("link/*.txt").unwrap(), vec!["link/file.txt"]);
        assert_eq!(expander.expand("link/file.txt").unwrap(), vec!["link/file.txt"]);
        assert_eq!(
            sorted(expander.expand("*/file.txt").unwrap()),
            vec!["link/file.txt", "real/file.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_terminates() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "real/file.txt");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("real/again"))
            .unwrap();

        let expander = PatternExpander::new(dir.path()).unwrap();
        let paths = expander.expand("**/*.txt").unwrap();
        assert!(paths.contains(&"real/file.txt".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "open/a.txt");
        touch(dir.path(), "locked/b.txt");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through 000 directories
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let expander = PatternExpander::new(dir.path()).unwrap();
        let result = expander.expand("**/*.txt");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.unwrap(), vec!["open/a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_space_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.txt");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert!(expander.expand("*.txt ").unwrap().is_empty());

        touch(dir.path(), "b.txt ");
        assert_eq!(expander.expand("*.txt ").unwrap(), vec!["b.txt "]);
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_escapes_wildcard() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a*b.txt");
        touch(dir.path(), "axb.txt");

        let expander = PatternExpander::new(dir.path()).unwrap();
        assert_eq!(expander.expand("a\\*b.*").unwrap(), vec!["a*b.txt"]);
    }

    #[test]
    fn test_reflects_live_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let expander = PatternExpander::new(dir.path()).unwrap();
        assert!(expander.expand("*.log").unwrap().is_empty());

        touch(dir.path(), "run.log");
        assert_eq!(expander.expand("*.log").unwrap(), vec!["run.log"]);
    }
}
