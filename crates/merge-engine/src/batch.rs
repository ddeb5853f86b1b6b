//! Episode-aligned batch merging.
//!
//! A [`MergeJob`] lists subtitle sets, each holding one file per episode.
//! Episode `n` merges file `n` of every set into one output file.

use std::collections::HashSet;
use std::path::PathBuf;

use submerge_subtitle_model::{Document, MergeJob, TrackSpec};

use crate::engine::{MergeEngine, MergeStats};
use crate::error::MergeError;
use crate::normalize;
use crate::output;

/// The tracks and destination for one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodePlan {
    /// Zero-based episode index.
    pub index: usize,
    pub tracks: Vec<TrackSpec>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeReport {
    pub index: usize,
    pub output: PathBuf,
    pub stats: MergeStats,
}

/// Expand a job into per-episode merges.
///
/// Sets without an explicit style take the template style at their own
/// position, or the last style when there are more sets than styles.
/// Episodes without any file are skipped. A derived output that is one of
/// the episode's own inputs is rejected.
pub fn plan_episodes(
    job: &MergeJob,
    template: &Document,
    extension: &str,
) -> Result<Vec<EpisodePlan>, MergeError> {
    if template.styles.is_empty() {
        return Err(MergeError::invalid_job(format!(
            "template {} defines no styles",
            job.template.display()
        )));
    }

    let styles: Vec<String> = job
        .sets
        .iter()
        .enumerate()
        .map(|(i, set)| {
            set.style.clone().unwrap_or_else(|| {
                let fallback = i.min(template.styles.len() - 1);
                template.styles[fallback].name().to_string()
            })
        })
        .collect();

    let mut plans = Vec::new();
    let mut outputs = HashSet::new();

    for index in 0..job.episode_count() {
        let tracks: Vec<TrackSpec> = job
            .sets
            .iter()
            .zip(&styles)
            .filter_map(|(set, style)| {
                let path = set.files.get(index)?.as_ref()?;
                if path.as_os_str().is_empty() {
                    return None;
                }
                Some(TrackSpec {
                    path: path.clone(),
                    style: style.clone(),
                    offset_ms: set.offset_ms,
                    sync_origin: set.sync_origin,
                })
            })
            .collect();

        if tracks.is_empty() {
            tracing::warn!(episode = index + 1, "no files for episode; skipping");
            continue;
        }

        let output = output::derive_output_path(&tracks, &job.output_dir, extension)
            .ok_or_else(|| {
                MergeError::invalid_job(format!(
                    "cannot derive an output name for episode {}",
                    index + 1
                ))
            })?;

        if output::is_input(&output, &tracks) {
            return Err(MergeError::invalid_job(format!(
                "episode {} would overwrite its input {}",
                index + 1,
                output.display()
            )));
        }

        if !outputs.insert(output.clone()) {
            return Err(MergeError::invalid_job(format!(
                "episodes would both write {}",
                output.display()
            )));
        }

        plans.push(EpisodePlan {
            index,
            tracks,
            output,
        });
    }

    Ok(plans)
}

/// Run every episode of a job in order, stopping at the first failure.
///
/// The styles of every episode are checked before any file is parsed.
pub fn run_job(
    engine: &MergeEngine,
    job: &MergeJob,
    extension: &str,
) -> Result<Vec<EpisodeReport>, MergeError> {
    let template = normalize::load_template(&job.template)?;
    let plans = plan_episodes(job, &template, extension)?;

    for plan in &plans {
        MergeEngine::validate_styles(&template, &plan.tracks)?;
    }

    std::fs::create_dir_all(&job.output_dir).map_err(|e| MergeError::io(&job.output_dir, e))?;

    let mut reports = Vec::with_capacity(plans.len());
    for plan in plans {
        tracing::info!(
            episode = plan.index + 1,
            tracks = plan.tracks.len(),
            "merging episode"
        );
        let outcome = engine.merge_into_file(&template, &plan.tracks, &plan.output)?;
        reports.push(EpisodeReport {
            index: plan.index,
            output: plan.output,
            stats: outcome.stats,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use submerge_formats::ssa;
    use submerge_subtitle_model::SubtitleSet;

    const TEMPLATE: &str = "[V4+ Styles]
Format: Name, Fontname
Style: Default,Arial
Style: Alt,Verdana
";

    fn template() -> Document {
        ssa::parse(TEMPLATE).unwrap()
    }

    fn set(files: &[Option<&str>]) -> SubtitleSet {
        SubtitleSet {
            files: files.iter().map(|f| f.map(PathBuf::from)).collect(),
            ..Default::default()
        }
    }

    fn job(sets: Vec<SubtitleSet>) -> MergeJob {
        MergeJob {
            template: PathBuf::from("template.ass"),
            output_dir: PathBuf::from("out"),
            sync_threshold_ms: None,
            sets,
        }
    }

    #[test]
    fn test_plan_assigns_default_styles_by_set_index() {
        let mut third = set(&[Some("c1.srt")]);
        third.offset_ms = 250;
        let job = job(vec![
            set(&[Some("a1.ass")]),
            set(&[Some("b1.srt")]),
            third,
        ]);

        let plans = plan_episodes(&job, &template(), "ass").unwrap();
        let styles: Vec<&str> = plans[0].tracks.iter().map(|t| t.style.as_str()).collect();
        assert_eq!(styles, ["Default", "Alt", "Alt"]);
        assert_eq!(plans[0].tracks[2].offset_ms, 250);
    }

    #[test]
    fn test_plan_skips_placeholders_and_empty_episodes() {
        let mut origin = set(&[Some("a1.ass"), None, None, Some("a4.ass")]);
        origin.sync_origin = true;
        origin.style = Some("Alt".to_string());
        let job = job(vec![origin, set(&[Some("b1.srt"), Some("b2.srt"), None])]);

        let plans = plan_episodes(&job, &template(), "ass").unwrap();
        let indices: Vec<usize> = plans.iter().map(|p| p.index).collect();
        assert_eq!(indices, [0, 1, 3]);

        assert_eq!(plans[0].tracks.len(), 2);
        assert_eq!(plans[0].tracks[0].style, "Alt");
        assert_eq!(plans[0].output, PathBuf::from("out/a1.ass"));
        assert_eq!(plans[1].output, PathBuf::from("out/b2.ass"));
        assert_eq!(plans[2].tracks.len(), 1);
    }

    #[test]
    fn test_plan_rejects_colliding_outputs() {
        let job = job(vec![set(&[Some("x/ep.srt"), Some("y/ep.srt")])]);
        let err = plan_episodes(&job, &template(), "ass").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_plan_rejects_output_over_input() {
        let mut origin = set(&[Some("subs/ep1.ass")]);
        origin.sync_origin = true;
        let mut job = job(vec![origin, set(&[Some("subs/ep1.srt")])]);

        for dir in ["subs", "./subs", "subs/extra/.."] {
            job.output_dir = PathBuf::from(dir);
            let err = plan_episodes(&job, &template(), "ass").unwrap_err();
            assert!(matches!(err, MergeError::InvalidJob { .. }), "dir {dir}");
        }
    }

    #[test]
    fn test_run_job_leaves_source_untouched_when_output_dir_is_source_dir() {
        let dir = std::env::temp_dir().join(format!("submerge-batch-inplace-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("template.ass"), TEMPLATE).unwrap();
        let source = "[Events]\nFormat: Start, End, Text\nDialogue: 0:00:01.00,0:00:02.00,Hi\n";
        std::fs::write(dir.join("ep1.ass"), source).unwrap();

        let mut origin = set(&[Some("ep1.ass")]);
        origin.sync_origin = true;
        let job = MergeJob {
            template: PathBuf::from("template.ass"),
            output_dir: PathBuf::from("."),
            sync_threshold_ms: None,
            sets: vec![origin],
        }
        .resolved_against(&dir);

        let err = run_job(&MergeEngine::default(), &job, "ass").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(std::fs::read_to_string(dir.join("ep1.ass")).unwrap(), source);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_plan_requires_template_styles() {
        let job = job(vec![set(&[Some("a.srt")])]);
        let err = plan_episodes(&job, &Document::default(), "ass").unwrap_err();
        assert!(matches!(err, MergeError::InvalidJob { .. }));
    }

    #[test]
    fn test_run_job_writes_one_file_per_episode() {
        let dir = std::env::temp_dir().join(format!("submerge-batch-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(dir.join("template.ass"), TEMPLATE).unwrap();
        for n in 1..=2 {
            std::fs::write(
                dir.join(format!("ep{n}.srt")),
                format!("1\n00:00:0{n},000 --> 00:00:0{n},900\nEpisode {n}\n"),
            )
            .unwrap();
        }

        let job = MergeJob {
            template: PathBuf::from("template.ass"),
            output_dir: PathBuf::from("merged"),
            sync_threshold_ms: None,
            sets: vec![set(&[Some("ep1.srt"), Some("ep2.srt")])],
        }
        .resolved_against(&dir);

        let reports = run_job(&MergeEngine::default(), &job, "ass").unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].stats.events, 1);

        let second = std::fs::read_to_string(dir.join("merged").join("ep2.ass")).unwrap();
        assert!(second.contains("Dialogue: 0,0:00:02.00,0:00:02.90,Default,,0,0,0,,Episode 2"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_run_job_checks_styles_before_writing() {
        let dir = std::env::temp_dir().join(format!("submerge-batch-style-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("template.ass"), TEMPLATE).unwrap();

        let mut bad = set(&[None, Some("ep2.srt")]);
        bad.style = Some("Missing".to_string());
        let job = MergeJob {
            template: dir.join("template.ass"),
            output_dir: dir.join("merged"),
            sync_threshold_ms: None,
            sets: vec![set(&[Some("ep1.srt")]), bad],
        };

        let err = run_job(&MergeEngine::default(), &job, "ass").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!dir.join("merged").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
