//! Show the configuration file location and effective settings.

use submerge_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool, force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    println!("Config file: {}", path.display());

    if init {
        if path.exists() && !force {
            println!("  Already exists; pass --force to overwrite it with defaults");
        } else {
            AppConfig::default()
                .save()
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            println!("  Wrote default settings");
        }
    } else if !path.exists() {
        println!("  (not present; built-in defaults apply)");
    }

    println!();
    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults_once() {
        let dir = std::env::temp_dir().join(format!("submerge-cli-config-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::env::set_var("XDG_CONFIG_HOME", &dir);
        let path = config_file_path();
        assert!(path.starts_with(&dir));

        run(&AppConfig::default(), true, false).unwrap();
        let written = AppConfig::load_from(&path).unwrap();
        assert_eq!(written.merge.sync_threshold_ms, 500);

        std::fs::write(&path, "{}").unwrap();
        run(&AppConfig::default(), true, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        run(&AppConfig::default(), true, true).unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "{}");

        std::fs::remove_dir_all(&dir).ok();
    }
}
