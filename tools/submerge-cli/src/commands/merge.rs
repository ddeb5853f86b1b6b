//! Merge tracks given on the command line.

use std::path::PathBuf;
use std::str::FromStr;

use submerge_common::config::AppConfig;
use submerge_merge_engine::normalize::load_template;
use submerge_merge_engine::output::{derive_output_path, is_input};
use submerge_merge_engine::MergeEngine;
use submerge_subtitle_model::TrackSpec;

/// A `--track` argument: `PATH[,style=NAME][,offset=MS][,origin]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackArg {
    pub path: PathBuf,
    pub style: Option<String>,
    pub offset_ms: i64,
    pub sync_origin: bool,
}

impl FromStr for TrackArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let path = parts.next().map(str::trim).unwrap_or_default();
        if path.is_empty() {
            return Err("track path is empty".to_string());
        }

        let mut arg = TrackArg {
            path: PathBuf::from(path),
            style: None,
            offset_ms: 0,
            sync_origin: false,
        };

        for option in parts.map(str::trim).filter(|o| !o.is_empty()) {
            match option.split_once('=') {
                Some(("style", name)) if !name.trim().is_empty() => {
                    arg.style = Some(name.trim().to_string());
                }
                Some(("offset", ms)) => {
                    arg.offset_ms = ms
                        .trim()
                        .parse()
                        .map_err(|_| format!("invalid offset `{ms}`, expected milliseconds"))?;
                }
                None if option == "origin" => arg.sync_origin = true,
                _ => return Err(format!("unknown track option `{option}`")),
            }
        }

        Ok(arg)
    }
}

impl TrackArg {
    fn into_spec(self, default_style: &str) -> TrackSpec {
        TrackSpec {
            path: self.path,
            style: self.style.unwrap_or_else(|| default_style.to_string()),
            offset_ms: self.offset_ms,
            sync_origin: self.sync_origin,
        }
    }
}

pub fn run(
    config: &AppConfig,
    template_path: PathBuf,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    threshold: Option<u64>,
    per_track_sync: bool,
    tracks: Vec<TrackArg>,
) -> anyhow::Result<()> {
    let options = super::merge_options(config, threshold, per_track_sync)?;

    let template = load_template(&template_path)
        .map_err(|e| anyhow::anyhow!("Failed to load template: {e}"))?;
    let default_style = template
        .style_names()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Template {} defines no styles", template_path.display()))?
        .to_string();

    let specs: Vec<TrackSpec> = tracks
        .into_iter()
        .map(|t| t.into_spec(&default_style))
        .collect();

    let output = match output {
        Some(path) => path,
        None => resolve_output(&specs, output_dir, &config.merge.output_extension)?,
    };

    let engine = MergeEngine::new(options);
    let outcome = engine.merge_into_file(&template, &specs, &output)?;

    println!("Merged {} tracks into {}", outcome.stats.tracks, output.display());
    println!("  Events: {}", outcome.stats.events);
    println!(
        "  Snapped: {} starts, {} ends (threshold {} ms)",
        outcome.stats.snapped_starts,
        outcome.stats.snapped_ends,
        engine.options().sync_threshold_ms
    );

    Ok(())
}

/// Derived output path inside `output_dir`, or the working directory.
///
/// Refuses a derived name that would replace one of the inputs.
fn resolve_output(
    specs: &[TrackSpec],
    output_dir: Option<PathBuf>,
    extension: &str,
) -> anyhow::Result<PathBuf> {
    let dir = output_dir.unwrap_or_default();
    let output = derive_output_path(specs, &dir, extension)
        .ok_or_else(|| anyhow::anyhow!("Cannot derive an output file name; pass --output"))?;

    if is_input(&output, specs) {
        anyhow::bail!(
            "Derived output {} would replace an input; pass --output or --output-dir",
            output.display()
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let arg: TrackArg = "subs/ep01.srt".parse().unwrap();
        assert_eq!(arg.path, PathBuf::from("subs/ep01.srt"));
        assert_eq!(arg.style, None);
        assert_eq!(arg.offset_ms, 0);
        assert!(!arg.sync_origin);
    }

    #[test]
    fn test_parse_all_options() {
        let arg: TrackArg = "ep01.ass, style=Alt ,offset=-1500,origin".parse().unwrap();
        assert_eq!(arg.style.as_deref(), Some("Alt"));
        assert_eq!(arg.offset_ms, -1500);
        assert!(arg.sync_origin);
    }

    #[test]
    fn test_parse_rejects_bad_options() {
        assert!("".parse::<TrackArg>().is_err());
        assert!("a.srt,offset=soon".parse::<TrackArg>().is_err());
        assert!("a.srt,style=".parse::<TrackArg>().is_err());
        assert!("a.srt,loud".parse::<TrackArg>().is_err());
    }

    #[test]
    fn test_default_style_applies_without_override() {
        let spec = "a.srt".parse::<TrackArg>().unwrap().into_spec("Default");
        assert_eq!(spec.style, "Default");

        let spec = "a.srt,style=Alt"
            .parse::<TrackArg>()
            .unwrap()
            .into_spec("Default");
        assert_eq!(spec.style, "Alt");
    }

    #[test]
    fn test_resolve_output_from_origin_name() {
        let specs = vec![
            TrackSpec::new("a/first.srt", "Default"),
            TrackSpec::new("b/second.en.srt", "Alt").as_sync_origin(),
        ];
        assert_eq!(
            resolve_output(&specs, None, "ass").unwrap(),
            PathBuf::from("second.en.ass")
        );
        assert_eq!(
            resolve_output(&specs, Some(PathBuf::from("out")), "ass").unwrap(),
            PathBuf::from("out/second.en.ass")
        );
    }

    #[test]
    fn test_resolve_output_refuses_to_replace_input() {
        let specs = vec![TrackSpec::new("b/second.ass", "Default").as_sync_origin()];
        assert!(resolve_output(&specs, Some(PathBuf::from("b")), "ass").is_err());
    }

    #[test]
    fn test_resolve_output_refuses_input_spelled_differently() {
        let specs = vec![TrackSpec::new("subs/ep.ass", "Default").as_sync_origin()];
        assert!(resolve_output(&specs, Some(PathBuf::from("./subs")), "ass").is_err());
        assert!(resolve_output(&specs, Some(PathBuf::from("subs/../subs")), "ass").is_err());
        assert!(resolve_output(&specs, Some(PathBuf::from("./out")), "ass").is_ok());
    }
}
