//! `.yulinkrc.json` configuration: everything the driver needs that the core
//! resolver itself has no opinion about — formatter invocation, which files
//! get skipped, and which directories are never walked.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".yulinkrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories (glob patterns, matched against the path relative to the
    /// run root) never walked for `.presl` files.
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Binary invoked to reformat emitted `.post.sol` files.
    #[serde(default = "default_formatter")]
    pub formatter: String,
    /// Extra arguments passed to the formatter before the target path.
    #[serde(default = "default_formatter_args")]
    pub formatter_args: Vec<String>,
    /// Seconds to wait for the formatter before giving up on it.
    #[serde(default = "default_formatter_timeout_secs")]
    pub formatter_timeout_secs: u64,
    /// How many leading lines of a `.presl` file are scanned for a
    /// `// does-not-compile` marker before giving up.
    #[serde(default = "default_skip_marker_lines")]
    pub skip_marker_lines: usize,
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string(), "**/out/**".to_string()]
}

fn default_formatter() -> String {
    "forge".to_string()
}

fn default_formatter_args() -> Vec<String> {
    vec!["fmt".to_string()]
}

fn default_formatter_timeout_secs() -> u64 {
    30
}

fn default_skip_marker_lines() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: default_ignores(),
            formatter: default_formatter(),
            formatter_args: default_formatter_args(),
            formatter_timeout_secs: default_formatter_timeout_secs(),
            skip_marker_lines: default_skip_marker_lines(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` is invalid.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }
        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

/// Walk upward from `start_dir` looking for `.yulinkrc.json`, stopping once
/// a `.git` directory is reached (the project root).
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
