//! Terminal reporting for a directory run: per-file status lines plus a
//! colored summary.

use colored::Colorize;

use crate::driver::{FileOutcome, RunReport};

pub fn print_report(report: &RunReport, root: &std::path::Path, verbose: bool) {
    println!("Found {} .presl files in {}", report.discovered, root.display());

    for (path, outcome) in &report.results {
        let relative = path.strip_prefix(root).unwrap_or(path);
        match outcome {
            FileOutcome::Written { output } => {
                if verbose {
                    println!("{} {}", "\u{2713}".green(), relative.display());
                    let output_relative = output.strip_prefix(root).unwrap_or(output);
                    println!("  output: {}", output_relative.display());
                }
            }
            FileOutcome::Skipped => {
                println!(
                    "{} {} (marked as non-compiling)",
                    "\u{2298}".yellow(),
                    relative.display()
                );
            }
            FileOutcome::Failed { error } => {
                eprintln!("{} {}: {}", "\u{2717}".red(), relative.display(), error);
            }
        }
    }

    let written = report.written_outputs().len();
    let skipped = report
        .results
        .iter()
        .filter(|(_, o)| matches!(o, FileOutcome::Skipped))
        .count();
    let failed = report
        .results
        .iter()
        .filter(|(_, o)| matches!(o, FileOutcome::Failed { .. }))
        .count();

    println!(
        "\n{written} written, {skipped} skipped, {failed} failed",
        written = written,
        skipped = skipped,
        failed = failed
    );
}
