//! Output naming and writing.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use submerge_subtitle_model::TrackSpec;

use crate::error::MergeError;

/// Name the merged file after the sync origin's file, or the first track's
/// file when no track is flagged: its stem plus `extension`, inside `dir`.
///
/// Returns `None` when there are no tracks.
pub fn derive_output_path(tracks: &[TrackSpec], dir: &Path, extension: &str) -> Option<PathBuf> {
    let source = tracks
        .iter()
        .find(|t| t.sync_origin)
        .or_else(|| tracks.first())?;

    // Push rather than `with_extension` so `show.en.srt` becomes `show.en.ass`.
    let mut name = source.path.file_stem()?.to_os_string();
    name.push(".");
    name.push(extension.trim_start_matches('.'));

    Some(dir.join(name))
}

/// Log a warning when the destination is one of the inputs.
pub fn warn_if_overwriting_input(output: &Path, tracks: &[TrackSpec]) {
    if let Some(track) = tracks.iter().find(|t| same_file(&t.path, output)) {
        tracing::warn!(
            path = %track.path.display(),
            "merged output replaces one of its own inputs"
        );
    }
}

/// Whether two paths name the same file, however they are spelled.
///
/// Existing files are compared by their canonical paths. Otherwise both
/// paths are made absolute against the working directory and `.`/`..`
/// components are resolved lexically.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => lexically_absolute(a) == lexically_absolute(b),
    }
}

/// Whether `output` is one of the tracks' input files.
pub fn is_input(output: &Path, tracks: &[TrackSpec]) -> bool {
    tracks.iter().any(|t| same_file(&t.path, output))
}

fn lexically_absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Write `contents` to a temporary sibling of `path`, then rename it into
/// place. Readers never observe a half-written file.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), MergeError> {
    let tmp = temp_sibling(path);

    let write = || -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp, path)
    };

    write().map_err(|e| {
        std::fs::remove_file(&tmp).ok();
        MergeError::io(path, e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}
