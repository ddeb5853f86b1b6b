//! Track settings and batch merge jobs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use submerge_common::error::{SubmergeError, SubmergeResult};

/// One input file plus its merge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSpec {
    /// Subtitle file. The extension selects the parser.
    pub path: PathBuf,

    /// Template style applied to every event of this track.
    pub style: String,

    /// Milliseconds added to every start/end before synchronization.
    #[serde(default)]
    pub offset_ms: i64,

    /// Whether this track is the timing reference other tracks snap to.
    #[serde(default)]
    pub sync_origin: bool,
}

impl TrackSpec {
    pub fn new(path: impl Into<PathBuf>, style: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            style: style.into(),
            offset_ms: 0,
            sync_origin: false,
        }
    }

    pub fn with_offset(mut self, offset_ms: i64) -> Self {
        self.offset_ms = offset_ms;
        self
    }

    pub fn as_sync_origin(mut self) -> Self {
        self.sync_origin = true;
        self
    }
}

/// A group of files sharing one offset and style, one file per episode.
///
/// `None` entries are placeholders that keep later files aligned with
/// their episode index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSet {
    pub files: Vec<Option<PathBuf>>,
    pub offset_ms: i64,

    /// Template style for the set. When absent the set takes the template
    /// style at its own index, clamped to the last style.
    pub style: Option<String>,

    pub sync_origin: bool,
}

/// Batch job description (`job.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeJob {
    /// Template supplying metadata and styles.
    pub template: PathBuf,

    /// Directory receiving one merged file per episode.
    pub output_dir: PathBuf,

    /// Overrides the configured default threshold.
    #[serde(default)]
    pub sync_threshold_ms: Option<u64>,

    pub sets: Vec<SubtitleSet>,
}

impl MergeJob {
    /// Parse a job from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a job file. Relative paths inside it are resolved against the
    /// directory containing the job file.
    pub fn load(path: &Path) -> SubmergeResult<Self> {
        if !path.exists() {
            return Err(SubmergeError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let job = Self::from_json(&content)?;
        if job.sets.is_empty() {
            return Err(SubmergeError::config(format!(
                "job {} contains no subtitle sets",
                path.display()
            )));
        }
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(job.resolved_against(base))
    }

    /// Copy of this job with every relative path joined onto `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        self.template = resolve(&self.template);
        self.output_dir = resolve(&self.output_dir);
        for set in &mut self.sets {
            for file in set.files.iter_mut().flatten() {
                *file = resolve(file);
            }
        }
        self
    }

    /// Number of episodes: the length of the longest file list.
    pub fn episode_count(&self) -> usize {
        self.sets.iter().map(|s| s.files.len()).max().unwrap_or(0)
    }
}
