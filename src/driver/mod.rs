//! Directory-level driver: discovers `.presl` files, runs the resolver over
//! each one, writes `.post.sol` output, and optionally reformats it.

pub mod format;
pub mod walk;

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::Resolver;

/// Outcome of preprocessing one `.presl` file.
pub enum FileOutcome {
    Written { output: PathBuf },
    Skipped,
    Failed { error: String },
}

pub struct RunReport {
    pub discovered: usize,
    pub results: Vec<(PathBuf, FileOutcome)>,
}

impl RunReport {
    pub fn any_failed(&self) -> bool {
        self.results
            .iter()
            .any(|(_, outcome)| matches!(outcome, FileOutcome::Failed { .. }))
    }

    pub fn written_outputs(&self) -> Vec<&Path> {
        self.results
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                FileOutcome::Written { output } => Some(output.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Preprocess every `.presl` file under `directory` (including `.t.presl`),
/// writing each result next to its source as `.post.sol`.
pub fn run(directory: &Path, config: &Config, format_output: bool, verbose: bool) -> RunReport {
    let files = walk::discover_presl_files(directory, config);
    let mut resolver = Resolver::new(directory).with_verbose(verbose);

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        if walk::should_skip_file(file, config.skip_marker_lines) {
            results.push((file.clone(), FileOutcome::Skipped));
            continue;
        }

        let outcome = match resolver.process_file(file) {
            Ok(content) => {
                let output = file.with_extension("post.sol");
                match std::fs::write(&output, content) {
                    Ok(()) => FileOutcome::Written { output },
                    Err(e) => FileOutcome::Failed {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => FileOutcome::Failed {
                error: e.to_string(),
            },
        };
        results.push((file.clone(), outcome));
    }

    let report = RunReport {
        discovered: files.len(),
        results,
    };

    if format_output && !report.written_outputs().is_empty() {
        format::format_directory(
            &config.formatter,
            &config.formatter_args,
            directory,
            config.formatter_timeout_secs,
        );
    }

    report
}
