//! Error kinds raised by the resolver.
//!
//! Every variant is fatal to the *current* resolution; the driver shell
//! (`driver::walk`) decides whether to record the failure and continue with
//! the next file.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("function '{name}' not found in {location}; available: {available}")]
    FunctionNotFound {
        name: String,
        location: String,
        available: String,
    },

    #[error(
        "function signature conflict for '{name}':\n  existing: {existing}\n  new:      {new}"
    )]
    SignatureConflict {
        name: String,
        existing: String,
        new: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import chain exceeded the recursion limit while resolving '{name}' from {location}")]
    RecursionLimit { name: String, location: String },
}

impl ResolveError {
    pub fn function_not_found(
        name: &str,
        location: impl Into<String>,
        available: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut names: Vec<String> = available.into_iter().collect();
        names.sort();
        ResolveError::FunctionNotFound {
            name: name.to_string(),
            location: location.into(),
            available: names.join(", "),
        }
    }

    pub fn read_file(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResolveError::FileNotFound(path.to_path_buf())
        } else {
            ResolveError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
