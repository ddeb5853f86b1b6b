//! Timestamp snapping against a synchronization origin.
//!
//! The origin track's start and end times are recorded as unused sync
//! points. Each foreign event snaps its start (and independently its end)
//! to the nearest unused point within the threshold, consuming that point.
//! Matching is greedy, per event, in track order.

use std::collections::BTreeSet;

use submerge_subtitle_model::{Event, Timestamp};

/// Unused reference timestamps for one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPoints {
    starts: BTreeSet<Timestamp>,
    ends: BTreeSet<Timestamp>,
}

impl SyncPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the start and end of every origin event.
    pub fn from_events(events: &[Event]) -> Self {
        let mut points = Self::new();
        for event in events {
            points.record(event);
        }
        points
    }

    pub fn record(&mut self, event: &Event) {
        self.starts.insert(event.start);
        self.ends.insert(event.end);
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.ends.is_empty()
    }

    pub fn unused_starts(&self) -> usize {
        self.starts.len()
    }

    pub fn unused_ends(&self) -> usize {
        self.ends.len()
    }

    pub fn has_start(&self, timestamp: Timestamp) -> bool {
        self.starts.contains(&timestamp)
    }

    pub fn has_end(&self, timestamp: Timestamp) -> bool {
        self.ends.contains(&timestamp)
    }
}

/// Result of snapping one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnappedTrack {
    pub events: Vec<Event>,

    /// Sync points still unused after this track.
    pub remaining: SyncPoints,

    pub snapped_starts: usize,
    pub snapped_ends: usize,
}

/// Snap a foreign track's events against `points`, consuming each point
/// at most once per side.
///
/// Events are processed in order, so earlier events get first pick.
pub fn snap_track(events: Vec<Event>, points: SyncPoints, threshold_ms: u64) -> SnappedTrack {
    let SyncPoints {
        mut starts,
        mut ends,
    } = points;
    let mut snapped_starts = 0;
    let mut snapped_ends = 0;

    let events = events
        .into_iter()
        .map(|mut event| {
            if let Some(start) = take_nearest(&mut starts, event.start, threshold_ms) {
                event.start = start;
                snapped_starts += 1;
            }
            if let Some(end) = take_nearest(&mut ends, event.end, threshold_ms) {
                event.end = end;
                snapped_ends += 1;
            }
            event
        })
        .collect();

    SnappedTrack {
        events,
        remaining: SyncPoints { starts, ends },
        snapped_starts,
        snapped_ends,
    }
}

/// Remove and return the point closest to `target` if it lies within
/// `threshold_ms`. Equidistant candidates resolve to the earlier one.
pub fn take_nearest(
    points: &mut BTreeSet<Timestamp>,
    target: Timestamp,
    threshold_ms: u64,
) -> Option<Timestamp> {
    let before = points.range(..=target).next_back().copied();
    let after = points.range(target..).next().copied();

    let nearest = match (before, after) {
        (Some(b), Some(a)) if a.abs_diff_ms(target) < b.abs_diff_ms(target) => a,
        (Some(b), _) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };

    if nearest.abs_diff_ms(target) > threshold_ms {
        return None;
    }

    points.remove(&nearest);
    Some(nearest)
}
