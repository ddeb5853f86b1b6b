//! Parser for SSA/ASS scripts.
//!
//! The parser is line-oriented. Section headers switch the current
//! section, and every other line is a `Descriptor: value` pair that is
//! dispatched on the section and the lowercased descriptor. Style and
//! event rows are assigned to the columns declared by the preceding
//! `Format:` line by position. The last declared column absorbs the rest
//! of the line, so dialogue containing commas is never truncated.

use indexmap::IndexMap;
use submerge_subtitle_model::{Document, Event, Style, Timestamp};

use crate::error::ParseError;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the first header, or inside a section we don't use.
    Ignored,
    ScriptInfo,
    Styles,
    Events,
}

impl Section {
    fn from_header(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("script info") {
            Self::ScriptInfo
        } else if name.eq_ignore_ascii_case("v4 styles") || name.eq_ignore_ascii_case("v4+ styles")
        {
            Self::Styles
        } else if name.eq_ignore_ascii_case("events") {
            Self::Events
        } else {
            Self::Ignored
        }
    }
}

/// Parse an SSA/ASS script into a [`Document`].
///
/// # Errors
/// Fails when a style or event row has fewer fields than declared columns,
/// when an event lacks `Start`, `End` or `Text`, when a value cannot be
/// converted, or when an unknown descriptor appears in the style section.
/// Lines without a `:` are skipped with a warning.
pub fn parse(data: &str) -> Result<Document, ParseError> {
    let data = data.strip_prefix(BYTE_ORDER_MARK).unwrap_or(data);

    let mut document = Document::default();
    let mut section = Section::Ignored;
    let mut section_name = String::new();

    for (index, raw_line) in data.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').unwrap_or(header);
            section = Section::from_header(name);
            section_name = name.to_string();
            continue;
        }

        let Some((descriptor, value)) = line.split_once(':') else {
            tracing::warn!(line = line_number, "no descriptor found, skipping line");
            continue;
        };
        let value = value.trim();

        match section {
            Section::Ignored => {}
            Section::ScriptInfo => {
                document
                    .script_info
                    .push((descriptor.to_string(), value.to_string()));
            }
            Section::Styles => match descriptor.trim().to_ascii_lowercase().as_str() {
                "format" => document.style_columns = split_columns(value),
                "style" => {
                    let style = parse_style(value, &document.style_columns, line_number)?;
                    document.styles.push(style);
                }
                _ => {
                    return Err(ParseError::InvalidDescriptor {
                        line: line_number,
                        section: section_name.clone(),
                        descriptor: descriptor.to_string(),
                    });
                }
            },
            Section::Events => match descriptor.trim().to_ascii_lowercase().as_str() {
                "format" => document.event_columns = split_columns(value),
                "dialogue" => {
                    let event = parse_event(value, &document.event_columns, line_number)?;
                    document.events.push(event);
                }
                other => {
                    tracing::debug!(line = line_number, descriptor = other, "ignoring event line");
                }
            },
        }
    }

    tracing::debug!(
        metadata = document.script_info.len(),
        styles = document.styles.len(),
        events = document.events.len(),
        "parsed SSA document"
    );

    Ok(document)
}

/// Split a `Format:` value into trimmed column names.
fn split_columns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|column| column.trim().to_string())
        .collect()
}

/// Assign comma-separated fields to columns by position. The last column
/// receives everything after the second-to-last comma.
fn assign_fields<'c, 'v>(
    value: &'v str,
    columns: &'c [String],
    table: &'static str,
    line: usize,
) -> Result<Vec<(&'c str, &'v str)>, ParseError> {
    let mut split = value.splitn(columns.len(), ',');
    columns
        .iter()
        .map(|column| {
            split
                .next()
                .map(|field| (column.as_str(), field))
                .ok_or_else(|| ParseError::MissingField {
                    line,
                    table,
                    column: column.clone(),
                })
        })
        .collect()
}

fn parse_style(value: &str, columns: &[String], line: usize) -> Result<Style, ParseError> {
    let fields: IndexMap<String, String> = assign_fields(value, columns, "style", line)?
        .into_iter()
        .map(|(column, field)| (column.to_string(), field.to_string()))
        .collect();

    Style::from_fields(fields).ok_or(ParseError::MissingStyleName { line })
}

fn parse_event(value: &str, columns: &[String], line: usize) -> Result<Event, ParseError> {
    let fields = assign_fields(value, columns, "event", line)?;
    let field = |name: &str| {
        fields
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, field)| *field)
    };

    let integer = |name: &str| -> Result<i32, ParseError> {
        match field(name).map(str::trim) {
            None | Some("") => Ok(0),
            Some(raw) => raw.parse().map_err(|_| ParseError::InvalidInteger {
                line,
                column: name.to_string(),
                value: raw.to_string(),
            }),
        }
    };

    let timestamp = |name: &'static str| -> Result<Timestamp, ParseError> {
        let raw = field(name).ok_or(ParseError::MissingColumn { line, column: name })?;
        Timestamp::parse_ssa(raw.trim())
            .map_err(|source| ParseError::InvalidTimestamp { line, source })
    };

    let text = |name: &'static str| field(name).map(|v| v.trim().to_string()).unwrap_or_default();

    Ok(Event {
        layer: integer("Layer")?,
        start: timestamp("Start")?,
        end: timestamp("End")?,
        style: text("Style"),
        name: text("Name"),
        margin_left: integer("MarginL")?,
        margin_right: integer("MarginR")?,
        margin_vertical: integer("MarginV")?,
        effect: text("Effect"),
        text: field("Text")
            .ok_or(ParseError::MissingColumn {
                line,
                column: "Text",
            })?
            .to_string(),
    })
}
