//! Merge orchestration.
//!
//! Tracks are merged strictly in sequence: the synchronization origin
//! first, then every other track in the order given. Each merge owns its
//! sync points; nothing carries over between calls.

use std::path::Path;

use submerge_formats::emit;
use submerge_subtitle_model::{Document, Event, TrackSpec};

use crate::error::MergeError;
use crate::normalize;
use crate::output;
use crate::sync::{self, SyncPoints};

/// How foreign tracks share the origin's sync points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsumptionScope {
    /// One pool for the whole merge. A point used by one track is gone
    /// for every later track.
    #[default]
    Shared,
    /// Every foreign track snaps against a fresh copy of the origin points.
    PerTrack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Maximum distance in milliseconds a timestamp may move when snapping.
    pub sync_threshold_ms: u64,
    pub consumption: ConsumptionScope,
}

/// A track whose file has already been read and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTrack {
    pub spec: TrackSpec,
    pub events: Vec<Event>,
}

impl LoadedTrack {
    pub fn load(spec: TrackSpec) -> Result<Self, MergeError> {
        let events = normalize::load_track_events(&spec.path)?;
        Ok(Self { spec, events })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub tracks: usize,
    pub events: usize,
    pub snapped_starts: usize,
    pub snapped_ends: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged events sorted by start time.
    pub events: Vec<Event>,
    pub stats: MergeStats,
}

/// Merges subtitle tracks into a single event list.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Engine with shared consumption and the given threshold.
    pub fn with_threshold(sync_threshold_ms: u64) -> Self {
        Self::new(MergeOptions {
            sync_threshold_ms,
            ..Default::default()
        })
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Check that every track names a style present in the template.
    pub fn validate_styles(template: &Document, tracks: &[TrackSpec]) -> Result<(), MergeError> {
        match tracks.iter().find(|t| !template.has_style(&t.style)) {
            Some(track) => Err(MergeError::UnknownStyle {
                style: track.style.clone(),
                path: track.path.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Load every track and merge them. Returns events sorted by start.
    pub fn merge(&self, template: &Document, tracks: &[TrackSpec]) -> Result<Vec<Event>, MergeError> {
        self.merge_with_stats(template, tracks)
            .map(|outcome| outcome.events)
    }

    pub fn merge_with_stats(
        &self,
        template: &Document,
        tracks: &[TrackSpec],
    ) -> Result<MergeOutcome, MergeError> {
        Self::validate_styles(template, tracks)?;

        let loaded = tracks
            .iter()
            .cloned()
            .map(LoadedTrack::load)
            .collect::<Result<Vec<_>, _>>()?;

        self.merge_loaded(template, loaded)
    }

    /// Merge tracks whose events are already in memory.
    pub fn merge_loaded(
        &self,
        template: &Document,
        tracks: Vec<LoadedTrack>,
    ) -> Result<MergeOutcome, MergeError> {
        let specs: Vec<TrackSpec> = tracks.iter().map(|t| t.spec.clone()).collect();
        Self::validate_styles(template, &specs)?;

        let mut stats = MergeStats {
            tracks: tracks.len(),
            ..Default::default()
        };
        let (origin, foreign) = split_origin(tracks);

        let mut merged = Vec::new();
        let mut points = SyncPoints::new();

        if let Some(origin) = origin {
            let events = prepare(origin);
            points = SyncPoints::from_events(&events);
            tracing::debug!(
                starts = points.unused_starts(),
                ends = points.unused_ends(),
                "recorded sync points"
            );
            merged.extend(events);
        }

        for track in foreign {
            let path = track.spec.path.clone();
            let events = prepare(track);

            let available = match self.options.consumption {
                ConsumptionScope::Shared => std::mem::take(&mut points),
                ConsumptionScope::PerTrack => points.clone(),
            };
            let snapped = sync::snap_track(events, available, self.options.sync_threshold_ms);
            if self.options.consumption == ConsumptionScope::Shared {
                points = snapped.remaining;
            }

            tracing::debug!(
                path = %path.display(),
                snapped_starts = snapped.snapped_starts,
                snapped_ends = snapped.snapped_ends,
                "synchronized track"
            );
            stats.snapped_starts += snapped.snapped_starts;
            stats.snapped_ends += snapped.snapped_ends;
            merged.extend(snapped.events);
        }

        // Stable: equal starts keep their insertion order.
        merged.sort_by_key(|event| event.start);
        stats.events = merged.len();

        Ok(MergeOutcome {
            events: merged,
            stats,
        })
    }

    /// Load the template, merge the tracks, and write the result to `output_path`.
    ///
    /// Styles are checked and every file is parsed before anything is
    /// written. The output appears only once it is complete.
    pub fn merge_to_file(
        &self,
        template_path: &Path,
        tracks: &[TrackSpec],
        output_path: &Path,
    ) -> Result<MergeOutcome, MergeError> {
        let template = normalize::load_template(template_path)?;
        self.merge_into_file(&template, tracks, output_path)
    }

    /// Like [`merge_to_file`](Self::merge_to_file) with an already loaded template.
    pub fn merge_into_file(
        &self,
        template: &Document,
        tracks: &[TrackSpec],
        output_path: &Path,
    ) -> Result<MergeOutcome, MergeError> {
        let outcome = self.merge_with_stats(template, tracks)?;

        let rendered = emit::serialize(template, &outcome.events);
        output::warn_if_overwriting_input(output_path, tracks);
        output::write_atomically(output_path, &rendered)?;

        tracing::info!(
            output = %output_path.display(),
            tracks = outcome.stats.tracks,
            events = outcome.stats.events,
            snapped_starts = outcome.stats.snapped_starts,
            snapped_ends = outcome.stats.snapped_ends,
            "wrote merged subtitles"
        );

        Ok(outcome)
    }
}

/// Separate the first flagged track from the rest, which keep their order.
fn split_origin(tracks: Vec<LoadedTrack>) -> (Option<LoadedTrack>, Vec<LoadedTrack>) {
    let mut origin = None;
    let mut foreign = Vec::with_capacity(tracks.len());

    for track in tracks {
        if !track.spec.sync_origin {
            foreign.push(track);
        } else if origin.is_none() {
            origin = Some(track);
        } else {
            tracing::warn!(
                path = %track.spec.path.display(),
                "more than one sync origin; treating this track as a regular track"
            );
            foreign.push(track);
        }
    }

    (origin, foreign)
}

/// Apply a track's offset and style to each of its events.
fn prepare(track: LoadedTrack) -> Vec<Event> {
    let LoadedTrack { spec, events } = track;

    let clamped = events
        .iter()
        .filter(|e| {
            e.start.checked_shift(spec.offset_ms).is_none()
                || e.end.checked_shift(spec.offset_ms).is_none()
        })
        .count();
    if clamped > 0 {
        tracing::warn!(
            path = %spec.path.display(),
            offset_ms = spec.offset_ms,
            clamped,
            "offset moves events outside the day; clamping"
        );
    }

    events
        .iter()
        .map(|event| event.shifted(spec.offset_ms).with_style(spec.style.as_str()))
        .collect()
}
