//! `.presl` file discovery and the skip-marker check.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Config;

/// Every `.presl` file under `directory` (recursively; `.t.presl` files are
/// included since they end in `.presl`), minus anything matching an
/// `ignores` pattern, in sorted order for deterministic processing.
pub fn discover_presl_files(directory: &Path, config: &Config) -> Vec<PathBuf> {
    let patterns: Vec<Pattern> = config
        .ignores
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let candidates: Vec<PathBuf> = WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("presl"))
        .map(|entry| entry.into_path())
        .collect();

    let mut files: Vec<PathBuf> = candidates
        .into_par_iter()
        .filter(|path| {
            let relative = path.strip_prefix(directory).unwrap_or(path);
            !patterns.iter().any(|pattern| pattern.matches_path(relative))
        })
        .collect();

    files.sort();
    files
}

/// `// does-not-compile` (or the no-space spelling) in the first
/// `max_lines` lines marks a file to be left untouched by the driver.
pub fn should_skip_file(path: &Path, max_lines: usize) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let reader = BufReader::new(file);

    for line in reader.lines().take(max_lines) {
        let Ok(line) = line else { break };
        let normalized: String = line
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if normalized.contains("does-not-compile") || normalized.contains("doesnotcompile") {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_presl_and_t_presl_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.presl"), "").unwrap();
        fs::write(dir.path().join("b.t.presl"), "").unwrap();
        fs::write(dir.path().join("c.sol"), "").unwrap();

        let files = discover_presl_files(dir.path(), &Config::default());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn respects_ignore_patterns() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out").join("a.presl"), "").unwrap();
        fs::write(dir.path().join("b.presl"), "").unwrap();

        let files = discover_presl_files(dir.path(), &Config::default());
        assert_eq!(files, vec![dir.path().join("b.presl")]);
    }

    #[test]
    fn detects_skip_marker_with_loose_spacing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.presl");
        fs::write(&path, "// pragma\n// does - not - compile\ncontract C {}").unwrap();
        assert!(should_skip_file(&path, 10));
    }

    #[test]
    fn does_not_flag_ordinary_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ok.presl");
        fs::write(&path, "contract C {}").unwrap();
        assert!(!should_skip_file(&path, 10));
    }

    #[test]
    fn marker_outside_window_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.presl");
        let mut content = "line\n".repeat(11);
        content.push_str("// does-not-compile\n");
        fs::write(&path, content).unwrap();
        assert!(!should_skip_file(&path, 10));
    }
}
