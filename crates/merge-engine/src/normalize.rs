//! Track normalization.
//!
//! Loads a subtitle file and converts it into plain [`Event`]s ready for
//! merging. SSA input loses its inline override tags; SubRip input gets
//! its line breaks rewritten as ASS hard breaks.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use submerge_formats::{Parsed, SrtEntry, SubtitleFormat};
use submerge_subtitle_model::{Document, Event};

use crate::error::MergeError;

/// `{...}` blocks, or an unterminated `{` running to the end of the text.
static OVERRIDE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}|\{.*").expect("override tag pattern is valid"));

/// ASS hard line break.
pub const HARD_BREAK: &str = "\\N";

/// Remove inline override tags from dialogue text.
pub fn strip_override_tags(text: &str) -> String {
    OVERRIDE_TAG.replace_all(text, "").into_owned()
}

/// Strip override tags and drop events left without visible text.
pub fn normalize_ssa(document: Document) -> Vec<Event> {
    let total = document.events.len();
    let events: Vec<Event> = document
        .events
        .into_iter()
        .filter_map(|mut event| {
            event.text = strip_override_tags(&event.text);
            (!event.text.trim().is_empty()).then_some(event)
        })
        .collect();

    if events.len() < total {
        tracing::debug!(
            dropped = total - events.len(),
            "dropped events with no text after removing override tags"
        );
    }

    events
}

/// Convert SubRip blocks to events, escaping internal line breaks.
pub fn normalize_srt(entries: Vec<SrtEntry>) -> Vec<Event> {
    entries
        .into_iter()
        .map(|entry| Event::new(entry.start, entry.end, entry.text.replace('\n', HARD_BREAK)))
        .collect()
}

/// Read, parse and normalize one track file.
pub fn load_track_events(path: &Path) -> Result<Vec<Event>, MergeError> {
    let parsed = read_and_parse(path)?;
    let events = match parsed {
        Parsed::Ssa(document) => normalize_ssa(document),
        Parsed::SubRip(entries) => normalize_srt(entries),
    };

    tracing::debug!(path = %path.display(), events = events.len(), "loaded track");
    Ok(events)
}

/// Read and parse the template script. Only SSA/ASS files qualify.
pub fn load_template(path: &Path) -> Result<Document, MergeError> {
    match SubtitleFormat::from_path(path) {
        Some(SubtitleFormat::Ssa) => {}
        _ => {
            return Err(MergeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }

    match read_and_parse(path)? {
        Parsed::Ssa(document) => Ok(document),
        Parsed::SubRip(_) => Err(MergeError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Detect the format, read the whole file, and parse it.
pub fn read_and_parse(path: &Path) -> Result<Parsed, MergeError> {
    let format = SubtitleFormat::from_path(path).ok_or_else(|| MergeError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let data = std::fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;

    format.parse(&data).map_err(|source| MergeError::Format {
        path: path.to_path_buf(),
        source,
    })
}
