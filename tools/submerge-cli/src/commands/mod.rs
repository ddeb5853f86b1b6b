pub mod batch;
pub mod config;
pub mod info;
pub mod merge;
pub mod styles;

use submerge_common::config::AppConfig;
use submerge_merge_engine::{ConsumptionScope, MergeOptions};

/// Merge options from an optional threshold override and the config defaults.
pub(crate) fn merge_options(
    config: &AppConfig,
    threshold: Option<u64>,
    per_track_sync: bool,
) -> anyhow::Result<MergeOptions> {
    let threshold = threshold.unwrap_or(config.merge.sync_threshold_ms);
    let sync_threshold_ms = config.merge.validate_threshold(threshold)?;

    Ok(MergeOptions {
        sync_threshold_ms,
        consumption: if per_track_sync {
            ConsumptionScope::PerTrack
        } else {
            ConsumptionScope::Shared
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_options_defaults_from_config() {
        let config = AppConfig::default();
        let options = merge_options(&config, None, false).unwrap();
        assert_eq!(options.sync_threshold_ms, 500);
        assert_eq!(options.consumption, ConsumptionScope::Shared);
    }

    #[test]
    fn test_merge_options_override_and_bounds() {
        let config = AppConfig::default();
        let options = merge_options(&config, Some(0), true).unwrap();
        assert_eq!(options.sync_threshold_ms, 0);
        assert_eq!(options.consumption, ConsumptionScope::PerTrack);

        assert!(merge_options(&config, Some(10_001), false).is_err());
    }
}
