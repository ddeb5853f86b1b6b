//! Run a batch job file.

use std::path::PathBuf;

use submerge_common::config::AppConfig;
use submerge_merge_engine::batch::run_job;
use submerge_merge_engine::MergeEngine;
use submerge_subtitle_model::MergeJob;

pub fn run(config: &AppConfig, path: PathBuf, per_track_sync: bool) -> anyhow::Result<()> {
    let job = MergeJob::load(&path).map_err(|e| anyhow::anyhow!("Failed to load job: {e}"))?;
    let options = super::merge_options(config, job.sync_threshold_ms, per_track_sync)?;

    println!(
        "Job: {} ({} sets, {} episodes)",
        path.display(),
        job.sets.len(),
        job.episode_count()
    );

    let engine = MergeEngine::new(options);
    let reports = run_job(&engine, &job, &config.merge.output_extension)?;

    for report in &reports {
        println!(
            "  Episode {}: {} ({} events, {} snapped)",
            report.index + 1,
            report.output.display(),
            report.stats.events,
            report.stats.snapped_starts + report.stats.snapped_ends
        );
    }
    println!("Merged {} episodes", reports.len());

    Ok(())
}
