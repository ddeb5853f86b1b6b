use std::path::PathBuf;

use submerge_formats::ssa;
use submerge_merge_engine::batch::run_job;
use submerge_merge_engine::{ErrorKind, MergeEngine};
use submerge_subtitle_model::{MergeJob, TrackSpec};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("subtitles")
        .join(name)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("submerge_fixture_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

fn fixture_tracks() -> Vec<TrackSpec> {
    vec![
        TrackSpec::new(fixture("episode01.srt"), "Alt").with_offset(400),
        TrackSpec::new(fixture("episode01.ass"), "Default").as_sync_origin(),
    ]
}

#[test]
fn bilingual_fixture_matches_expected_output() {
    submerge_common::logging::init_default_logging();
    let dir = scratch_dir("bilingual");
    let output = dir.join("episode01.ass");

    let outcome = MergeEngine::with_threshold(1_000)
        .merge_to_file(&fixture("template.ass"), &fixture_tracks(), &output)
        .expect("fixture merge should succeed");

    // The drawing-only event in the ASS track is dropped.
    assert_eq!(outcome.stats.events, 6);
    assert_eq!(outcome.stats.snapped_starts, 3);
    assert_eq!(outcome.stats.snapped_ends, 3);

    let written = std::fs::read_to_string(&output).expect("output should exist");
    let expected =
        std::fs::read_to_string(fixture("expected.ass")).expect("expected output should exist");
    assert_eq!(written, expected);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn merged_output_keeps_template_styles_verbatim() {
    let dir = scratch_dir("styles");
    let output = dir.join("merged.ass");

    MergeEngine::with_threshold(0)
        .merge_to_file(&fixture("template.ass"), &fixture_tracks(), &output)
        .expect("fixture merge should succeed");

    let template_text = std::fs::read_to_string(fixture("template.ass")).unwrap();
    let template = ssa::parse(&template_text).unwrap();
    let merged = ssa::parse(&std::fs::read_to_string(&output).unwrap()).unwrap();

    assert_eq!(merged.styles, template.styles);
    assert_eq!(merged.style_columns, template.style_columns);
    assert_eq!(merged.metadata("Title"), Some("Bilingual template"));
    for pair in merged.events.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_style_fails_before_output() {
    let dir = scratch_dir("unknown_style");
    let output = dir.join("merged.ass");
    let tracks = vec![
        TrackSpec::new(fixture("episode01.ass"), "Default").as_sync_origin(),
        TrackSpec::new(fixture("episode01.srt"), "Subtitles"),
    ];

    let err = MergeEngine::with_threshold(500)
        .merge_to_file(&fixture("template.ass"), &tracks, &output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn fixture_job_runs_end_to_end() {
    let dir = scratch_dir("job");
    let mut job = MergeJob::load(&fixture("job.json")).expect("fixture job should load");
    job.output_dir = dir.join("merged");

    let threshold = job.sync_threshold_ms.unwrap_or_default();
    let reports = run_job(&MergeEngine::with_threshold(threshold), &job, "ass")
        .expect("fixture job should succeed");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].output, dir.join("merged").join("episode01.ass"));

    let written = std::fs::read_to_string(&reports[0].output).unwrap();
    let expected = std::fs::read_to_string(fixture("expected.ass")).unwrap();
    assert_eq!(written, expected);

    std::fs::remove_dir_all(&dir).ok();
}
