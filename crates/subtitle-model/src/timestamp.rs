//! Subtitle timestamps.
//!
//! Both supported formats express times of day: the structured format as
//! `H:mm:ss.cc` (centiseconds, unpadded hours), the line-timed format as
//! `HH:MM:SS,mmm`. Internally a [`Timestamp`] keeps millisecond precision
//! so that line-timed input survives offsetting and snapping untouched;
//! centiseconds are only truncated when rendering the structured format.

use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Milliseconds in one day. Timestamps live in `[0, MILLIS_PER_DAY)`.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// A time-of-day position on a subtitle timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(NaiveTime);

/// A timestamp string that does not match the expected pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp `{value}` (expected {expected})")]
pub struct TimestampError {
    pub value: String,
    pub expected: &'static str,
}

impl Timestamp {
    /// Create a timestamp from milliseconds since midnight.
    ///
    /// Returns `None` outside `[0, MILLIS_PER_DAY)`.
    pub fn from_millis(millis: i64) -> Option<Self> {
        if !(0..MILLIS_PER_DAY).contains(&millis) {
            return None;
        }
        let secs = (millis / 1000) as u32;
        let nanos = (millis % 1000) as u32 * 1_000_000;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).map(Self)
    }

    /// Create a timestamp from clock components.
    pub fn from_hms_milli(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Option<Self> {
        NaiveTime::from_hms_milli_opt(hours, minutes, seconds, millis).map(Self)
    }

    /// Milliseconds since midnight.
    pub fn as_millis(&self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight()) * 1000
            + i64::from(self.0.nanosecond() / 1_000_000)
    }

    /// Shift by a signed millisecond offset, or `None` if the result
    /// leaves the day.
    pub fn checked_shift(&self, offset_ms: i64) -> Option<Self> {
        self.as_millis()
            .checked_add(offset_ms)
            .and_then(Self::from_millis)
    }

    /// Shift by a signed millisecond offset, clamping to the day bounds.
    pub fn saturating_shift(&self, offset_ms: i64) -> Self {
        let shifted = self
            .as_millis()
            .saturating_add(offset_ms)
            .clamp(0, MILLIS_PER_DAY - 1);
        Self::from_millis(shifted).unwrap_or(*self)
    }

    /// Absolute distance to another timestamp in milliseconds.
    pub fn abs_diff_ms(&self, other: Timestamp) -> u64 {
        self.0
            .signed_duration_since(other.0)
            .num_milliseconds()
            .unsigned_abs()
    }

    /// Parse the structured format's `H:mm:ss.cc` pattern.
    pub fn parse_ssa(input: &str) -> Result<Self, TimestampError> {
        parse_clock(input, '.', 1..=2, 2).ok_or_else(|| TimestampError {
            value: input.to_string(),
            expected: "H:mm:ss.cc",
        })
    }

    /// Parse the line-timed format's `HH:MM:SS,mmm` pattern.
    pub fn parse_srt(input: &str) -> Result<Self, TimestampError> {
        parse_clock(input, ',', 2..=2, 3).ok_or_else(|| TimestampError {
            value: input.to_string(),
            expected: "HH:MM:SS,mmm",
        })
    }

    /// Render as `H:mm:ss.cc`. Sub-centisecond precision is truncated.
    pub fn to_ssa_string(&self) -> String {
        let centis = self.0.nanosecond() / 10_000_000;
        format!(
            "{}:{:02}:{:02}.{centis:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }

    /// Render as `HH:MM:SS,mmm`.
    pub fn to_srt_string(&self) -> String {
        let millis = self.0.nanosecond() / 1_000_000;
        format!(
            "{:02}:{:02}:{:02},{millis:03}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ssa_string())
    }
}

/// Parse `hours:minutes:seconds<sep>fraction` with exact digit counts.
fn parse_clock(
    input: &str,
    fraction_separator: char,
    hour_digits: std::ops::RangeInclusive<usize>,
    fraction_digits: usize,
) -> Option<Timestamp> {
    let (clock, fraction) = input.split_once(fraction_separator)?;
    let mut parts = clock.split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    let seconds = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours)
        || !all_digits(minutes)
        || !all_digits(seconds)
        || !all_digits(fraction)
        || !hour_digits.contains(&hours.len())
        || minutes.len() != 2
        || seconds.len() != 2
        || fraction.len() != fraction_digits
    {
        return None;
    }

    let fraction_value: u32 = fraction.parse().ok()?;
    let millis = fraction_value * 10u32.pow(3 - fraction_digits as u32);

    Timestamp::from_hms_milli(
        hours.parse().ok()?,
        minutes.parse().ok()?,
        seconds.parse().ok()?,
        millis,
    )
}
