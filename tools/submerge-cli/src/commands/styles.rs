//! List template styles.

use std::path::PathBuf;

use submerge_merge_engine::normalize::load_template;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let template =
        load_template(&path).map_err(|e| anyhow::anyhow!("Failed to load template: {e}"))?;

    if template.styles.is_empty() {
        println!("{} defines no styles", path.display());
        return Ok(());
    }

    for (i, style) in template.styles.iter().enumerate() {
        let font = style.get("Fontname").unwrap_or("?");
        let size = style.get("Fontsize").unwrap_or("?");
        println!("{:>3}. {} ({font}, {size})", i + 1, style.name());
    }

    Ok(())
}
