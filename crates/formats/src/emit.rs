//! ASS serializer for merged documents.
//!
//! Metadata and the style table come from the template verbatim, in the
//! template's column order. Events always use the canonical ten-column
//! layout regardless of what the inputs declared.

use submerge_subtitle_model::{Document, Event};

/// Event columns written to every output file, in order.
pub const EVENT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// Render `template`'s metadata and styles plus `events` as an ASS script.
pub fn serialize(template: &Document, events: &[Event]) -> String {
    let mut output = String::new();

    output.push_str("[Script Info]\n");
    for (key, value) in &template.script_info {
        output.push_str(&format!("{key}: {value}\n"));
    }

    output.push_str("\n[V4+ Styles]\n");
    output.push_str(&format!("Format: {}\n", template.style_columns.join(", ")));
    for style in &template.styles {
        let values: Vec<&str> = template
            .style_columns
            .iter()
            .map(|column| style.get(column).unwrap_or_default())
            .collect();
        output.push_str(&format!("Style: {}\n", values.join(",")));
    }

    output.push_str("\n[Events]\n");
    output.push_str(&format!("Format: {}\n", EVENT_FORMAT.join(", ")));
    for event in events {
        output.push_str(&dialogue_line(event));
        output.push('\n');
    }

    output
}

/// Render one event as a `Dialogue:` line (without line terminator).
pub fn dialogue_line(event: &Event) -> String {
    format!(
        "Dialogue: {},{},{},{},{},{},{},{},{},{}",
        event.layer,
        event.start.to_ssa_string(),
        event.end.to_ssa_string(),
        event.style,
        event.name,
        event.margin_left,
        event.margin_right,
        event.margin_vertical,
        event.effect,
        event.text,
    )
}
