//! Show subtitle file information.

use std::path::PathBuf;

use submerge_formats::Parsed;
use submerge_merge_engine::normalize::read_and_parse;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let parsed = read_and_parse(&path)?;

    println!("File: {}", path.display());
    println!("  Format: {}", parsed.format());
    println!("  Events: {}", parsed.event_count());
    match parsed.time_span() {
        Some((start, end)) => println!("  Span: {start} - {end}"),
        None => println!("  Span: (empty)"),
    }

    if let Parsed::Ssa(document) = &parsed {
        println!();
        if let Some(title) = document.metadata("Title") {
            println!("  Title: {title}");
        }
        println!("  Metadata entries: {}", document.script_info.len());
        let names: Vec<&str> = document.style_names().collect();
        println!("  Styles ({}): {}", names.len(), names.join(", "));
    }

    Ok(())
}
