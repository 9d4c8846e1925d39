//! Invokes an external formatter (`forge fmt` by default) on the files this
//! run produced. Formatting failures are warnings, not errors — the
//! `.post.sol` output is already correct, just not pretty.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use colored::Colorize;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn format_directory(formatter: &str, args: &[String], directory: &Path, timeout_secs: u64) {
    let mut command = Command::new(formatter);
    command
        .args(args)
        .arg(directory)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            eprintln!(
                "{} formatter '{}' not found in PATH, skipping formatting",
                "warning:".yellow().bold(),
                formatter
            );
            return;
        }
        Err(e) => {
            eprintln!("{} failed to spawn formatter: {e}", "warning:".yellow().bold());
            return;
        }
    };

    match wait_with_timeout(child, Duration::from_secs(timeout_secs)) {
        WaitResult::Exited(status) if status.success() => {}
        WaitResult::Exited(status) => {
            eprintln!(
                "{} formatter exited with {status}",
                "warning:".yellow().bold()
            );
        }
        WaitResult::TimedOut => {
            eprintln!("{} formatter timed out after {timeout_secs}s", "warning:".yellow().bold());
        }
        WaitResult::Error(e) => {
            eprintln!("{} error waiting for formatter: {e}", "warning:".yellow().bold());
        }
    }
}

enum WaitResult {
    Exited(std::process::ExitStatus),
    TimedOut,
    Error(std::io::Error),
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> WaitResult {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return WaitResult::Exited(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return WaitResult::TimedOut;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return WaitResult::Error(e),
        }
    }
}
