//! Parse errors for both subtitle formats.

use submerge_subtitle_model::TimestampError;

/// Malformed subtitle input. Always fatal for the file being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {table} field `{column}` not found")]
    MissingField {
        line: usize,
        table: &'static str,
        column: String,
    },

    #[error("line {line}: event does not declare a `{column}` column")]
    MissingColumn { line: usize, column: &'static str },

    #[error("line {line}: style has no `Name` column")]
    MissingStyleName { line: usize },

    #[error("line {line}: invalid descriptor `{descriptor}` in [{section}] section")]
    InvalidDescriptor {
        line: usize,
        section: String,
        descriptor: String,
    },

    #[error("line {line}: {source}")]
    InvalidTimestamp {
        line: usize,
        #[source]
        source: TimestampError,
    },

    #[error("line {line}: `{value}` in column `{column}` is not an integer")]
    InvalidInteger {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: `{value}` is not a subtitle index")]
    InvalidIndex { line: usize, value: String },

    #[error("line {line}: timing line has no `-->` separator")]
    MissingTimingSeparator { line: usize },

    #[error("line {line}: subtitle block {index} ends before its timing line")]
    UnterminatedBlock { line: usize, index: u32 },
}

impl ParseError {
    /// 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingField { line, .. }
            | Self::MissingColumn { line, .. }
            | Self::MissingStyleName { line }
            | Self::InvalidDescriptor { line, .. }
            | Self::InvalidTimestamp { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::InvalidIndex { line, .. }
            | Self::MissingTimingSeparator { line }
            | Self::UnterminatedBlock { line, .. } => *line,
        }
    }
}
