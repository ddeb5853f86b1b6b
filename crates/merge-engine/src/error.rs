//! Merge errors.

use std::path::PathBuf;

use submerge_formats::ParseError;

/// Broad category of a merge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input file.
    Format,
    /// Inconsistent settings, such as a style missing from the template.
    Config,
    /// Input file with an unrecognized extension.
    UnsupportedFormat,
    /// Reading or writing failed.
    Io,
}

/// Errors that abort a merge. No output is written when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Format error in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Style `{style}` requested by {path} is not present in the template")]
    UnknownStyle { style: String, path: PathBuf },

    #[error("Unsupported subtitle format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid merge job: {message}")]
    InvalidJob { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::UnknownStyle { .. } | Self::InvalidJob { .. } => ErrorKind::Config,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_job(message: impl Into<String>) -> Self {
        Self::InvalidJob {
            message: message.into(),
        }
    }
}
