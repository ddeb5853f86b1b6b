//! Input format dispatch.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use submerge_subtitle_model::{Document, Timestamp};

use crate::error::ParseError;
use crate::srt::{self, SrtEntry};
use crate::ssa;

/// Supported input formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    /// `.ssa` / `.ass`
    Ssa,
    /// `.srt`
    SubRip,
}

impl SubtitleFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(OsStr::to_str)?;
        Self::from_extension(extension)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ssa" | "ass" => Some(Self::Ssa),
            "srt" => Some(Self::SubRip),
            _ => None,
        }
    }

    /// Parse file contents in this format.
    pub fn parse(self, data: &str) -> Result<Parsed, ParseError> {
        match self {
            Self::Ssa => ssa::parse(data).map(Parsed::Ssa),
            Self::SubRip => srt::parse(data).map(Parsed::SubRip),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ssa => f.write_str("SSA/ASS"),
            Self::SubRip => f.write_str("SubRip"),
        }
    }
}

/// Parser output, tagged by source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Ssa(Document),
    SubRip(Vec<SrtEntry>),
}

impl Parsed {
    pub fn format(&self) -> SubtitleFormat {
        match self {
            Self::Ssa(_) => SubtitleFormat::Ssa,
            Self::SubRip(_) => SubtitleFormat::SubRip,
        }
    }

    /// Number of events or blocks.
    pub fn event_count(&self) -> usize {
        match self {
            Self::Ssa(document) => document.events.len(),
            Self::SubRip(entries) => entries.len(),
        }
    }

    /// Earliest start and latest end.
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        match self {
            Self::Ssa(document) => document.time_span(),
            Self::SubRip(entries) => {
                let first = entries.iter().map(|e| e.start).min()?;
                let last = entries.iter().map(|e| e.end).max()?;
                Some((first, last))
            }
        }
    }
}
