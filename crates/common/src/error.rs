//! Error types shared across submerge crates.

use std::path::PathBuf;

/// Top-level error type for configuration and job-file handling.
///
/// Parse and merge failures have their own, more precise types in
/// `submerge-formats` and `submerge-merge-engine`.
#[derive(Debug, thiserror::Error)]
pub enum SubmergeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using SubmergeError.
pub type SubmergeResult<T> = Result<T, SubmergeError>;

impl SubmergeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
