//! Dispatch from parsed [`Arguments`] to the driver and a final exit status.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use crate::cli::args::Arguments;
use crate::cli::report::print_report;
use crate::config::load_config;
use crate::driver;

/// Outcome of one `yulink` invocation over a directory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every discovered `.presl` file resolved (or was skipped) cleanly.
    Success,
    /// At least one file failed to resolve — a missing import, a signature
    /// conflict, a cycle that couldn't be unified.
    Failure,
    /// The run never got as far as processing files: a bad directory
    /// argument or an unreadable/invalid `.yulinkrc.json`.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    if !args.directory.is_dir() {
        bail!("'{}' is not a directory", args.directory.display());
    }

    let load_result = load_config(&args.directory).context("failed to load configuration")?;
    let mut config = load_result.config;
    if let Some(formatter) = args.formatter {
        config.formatter = formatter;
    }

    let report = driver::run(&args.directory, &config, !args.no_format, args.verbose);
    print_report(&report, &args.directory, args.verbose);

    if report.any_failed() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }
}
