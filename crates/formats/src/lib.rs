//! Submerge Subtitle Formats
//!
//! Parsers and serializer for the two supported formats:
//! - **SSA/ASS:** section-based scripts with declared style/event columns
//! - **SubRip:** sequential index / time-range / text blocks
//! - **Emit:** renders a merged document back to ASS
//!
//! This crate is pure text processing. Reading and writing files is the
//! merge engine's job.

pub mod emit;
pub mod error;
pub mod format;
pub mod srt;
pub mod ssa;

pub use error::ParseError;
pub use format::{Parsed, SubtitleFormat};
pub use srt::SrtEntry;
