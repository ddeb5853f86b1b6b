//! Submerge Merge Engine
//!
//! Combines independently timed subtitle tracks into one ASS script:
//! - **Normalize:** Load each track and convert it to the common event shape
//! - **Sync:** Snap foreign timestamps to unused reference timestamps
//! - **Engine:** Order tracks, apply offsets and styles, sort the result
//! - **Output:** Derive output names and write files without partial results
//! - **Batch:** Merge episode-aligned subtitle sets from a job file
//!
//! Merging is single-threaded and synchronous. Every invocation builds its
//! own snapping state; nothing is shared between merges.

pub mod batch;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod output;
pub mod sync;

pub use engine::{ConsumptionScope, LoadedTrack, MergeEngine, MergeOptions, MergeOutcome, MergeStats};
pub use error::{ErrorKind, MergeError};
