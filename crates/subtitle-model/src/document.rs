//! Documents, styles, and events.
//!
//! A [`Document`] is what the structured-format parser produces: ordered
//! script metadata, the style table with its declared column order, and
//! the dialogue events. The line-timed parser's output is normalized into
//! the same [`Event`] shape before merging.

use indexmap::IndexMap;

use crate::timestamp::Timestamp;

/// Column that identifies a style.
pub const STYLE_NAME_COLUMN: &str = "Name";

/// A parsed subtitle script, or a template for the merged output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// `[Script Info]` pairs in file order. Keys may repeat.
    pub script_info: Vec<(String, String)>,

    /// Column names declared by the style table's `Format:` line.
    /// Governs both parse-time field assignment and output column order.
    pub style_columns: Vec<String>,

    /// Column names declared by the event table's `Format:` line.
    /// Only consulted while parsing.
    pub event_columns: Vec<String>,

    /// Styles in file order.
    pub styles: Vec<Style>,

    /// Dialogue events in file order.
    pub events: Vec<Event>,
}

impl Document {
    /// Look up a style by name.
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|style| style.name() == name)
    }

    /// Whether a style with this name exists.
    pub fn has_style(&self, name: &str) -> bool {
        self.style(name).is_some()
    }

    /// Style names in catalogue order.
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(Style::name)
    }

    /// First metadata value for a key (case-insensitive).
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.script_info
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Earliest start and latest end across all events.
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        events_time_span(&self.events)
    }
}

/// Earliest start and latest end of a set of events.
pub fn events_time_span(events: &[Event]) -> Option<(Timestamp, Timestamp)> {
    let first = events.iter().map(|e| e.start).min()?;
    let last = events.iter().map(|e| e.end).max()?;
    Some((first, last))
}

/// One row of the style table: raw values keyed by declared column name.
///
/// Values are kept verbatim so the template's style lines can be written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    fields: IndexMap<String, String>,
}

impl Style {
    /// Build a style from column/value pairs. Returns `None` if there is
    /// no `Name` column.
    pub fn from_fields(fields: IndexMap<String, String>) -> Option<Self> {
        if fields.contains_key(STYLE_NAME_COLUMN) {
            Some(Self { fields })
        } else {
            None
        }
    }

    /// The style's identifier.
    pub fn name(&self) -> &str {
        self.fields
            .get(STYLE_NAME_COLUMN)
            .map(|name| name.trim())
            .unwrap_or_default()
    }

    /// Raw value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// All column/value pairs in parse order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single dialogue event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub layer: i32,
    pub start: Timestamp,
    pub end: Timestamp,

    /// Style name. Assigned from the track settings at merge time.
    pub style: String,

    /// Speaker/actor label.
    pub name: String,

    pub margin_left: i32,
    pub margin_right: i32,
    pub margin_vertical: i32,
    pub effect: String,

    /// Dialogue payload. Line breaks are the two-character `\N` marker.
    pub text: String,
}

impl Event {
    /// Create an event with default layer, margins, and labels.
    pub fn new(start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            layer: 0,
            start,
            end,
            style: String::new(),
            name: String::new(),
            margin_left: 0,
            margin_right: 0,
            margin_vertical: 0,
            effect: String::new(),
            text: text.into(),
        }
    }

    /// Copy of this event with both ends moved by `offset_ms`, clamped
    /// to the day bounds.
    pub fn shifted(&self, offset_ms: i64) -> Self {
        Self {
            start: self.start.saturating_shift(offset_ms),
            end: self.end.saturating_shift(offset_ms),
            ..self.clone()
        }
    }

    /// Copy of this event with another style.
    pub fn with_style(self, style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            ..self
        }
    }

    /// Display duration in milliseconds (negative if end precedes start).
    pub fn duration_ms(&self) -> i64 {
        self.end.as_millis() - self.start.as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> Timestamp {
        Timestamp::from_millis(millis).unwrap()
    }

    fn style(name: &str, font: &str) -> Style {
        let mut fields = IndexMap::new();
        fields.insert("Name".to_string(), name.to_string());
        fields.insert("Fontname".to_string(), font.to_string());
        Style::from_fields(fields).unwrap()
    }

    #[test]
    fn test_style_requires_name() {
        let mut fields = IndexMap::new();
        fields.insert("Fontname".to_string(), "Arial".to_string());
        assert!(Style::from_fields(fields).is_none());
    }

    #[test]
    fn test_style_fields_keep_order() {
        let s = style("Default", "Arial");
        let columns: Vec<&str> = s.fields().map(|(k, _)| k).collect();
        assert_eq!(columns, vec!["Name", "Fontname"]);
        assert_eq!(s.get("Fontname"), Some("Arial"));
        assert_eq!(s.get("Bold"), None);
    }

    #[test]
    fn test_document_style_lookup() {
        let doc = Document {
            styles: vec![style("Default", "Arial"), style("Alt", "Verdana")],
            ..Default::default()
        };
        assert!(doc.has_style("Alt"));
        assert!(!doc.has_style("alt"));
        assert_eq!(doc.style("Alt").unwrap().get("Fontname"), Some("Verdana"));
        assert_eq!(doc.style_names().collect::<Vec<_>>(), vec!["Default", "Alt"]);
    }

    #[test]
    fn test_metadata_lookup_is_case_insensitive() {
        let doc = Document {
            script_info: vec![
                ("Title".to_string(), "Episode 1".to_string()),
                ("ScriptType".to_string(), "v4.00+".to_string()),
            ],
            ..Default::default()
        };
        assert_eq!(doc.metadata("title"), Some("Episode 1"));
        assert_eq!(doc.metadata("PlayResX"), None);
    }

    #[test]
    fn test_event_shift_and_style() {
        let event = Event::new(ts(1_000), ts(3_000), "Hello").with_style("Default");
        let shifted = event.shifted(500);
        assert_eq!(shifted.start, ts(1_500));
        assert_eq!(shifted.end, ts(3_500));
        assert_eq!(shifted.style, "Default");
        assert_eq!(shifted.text, "Hello");
        assert_eq!(event.start, ts(1_000));
        assert_eq!(shifted.duration_ms(), 2_000);
    }

    #[test]
    fn test_time_span() {
        let doc = Document {
            events: vec![
                Event::new(ts(5_000), ts(6_000), "b"),
                Event::new(ts(1_000), ts(9_000), "a"),
            ],
            ..Default::default()
        };
        assert_eq!(doc.time_span(), Some((ts(1_000), ts(9_000))));
        assert_eq!(Document::default().time_span(), None);
    }
}
