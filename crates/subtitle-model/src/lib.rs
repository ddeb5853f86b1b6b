//! Submerge Subtitle Model
//!
//! Defines the format-agnostic data contracts shared by the parsers,
//! the merge engine, and the serializer:
//! - **Timestamp:** Time-of-day values with millisecond storage
//! - **Document:** Script metadata, style catalogue, and events
//! - **Tracks:** Per-file merge settings and batch jobs
//!
//! Documents and events are plain values. The merge engine derives new
//! events from parsed ones instead of mutating them.

pub mod document;
pub mod timestamp;
pub mod track;

pub use document::*;
pub use timestamp::*;
pub use track::*;
