//! Media file location
//!
//! Resolves a raw path from imported data to a file that actually exists,
//! probing a fixed priority list of directories. A miss is a routine
//! outcome, not an error: exports regularly reference files that were never
//! shipped alongside the database.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::paths::{base_file_name, is_absolute_media_path};
use crate::store::results::LocatedFile;

/// Search for the file behind a raw media reference.
///
/// Candidates are probed in priority order: the raw path itself when
/// absolute, then the managed root, the imported subfolder, the project's
/// `media` directory, and finally each extra location in the order supplied.
/// The first candidate that is a regular file wins; directories and symlinks
/// are rejected.
pub fn locate_media_file(
    config: &MediaConfig,
    raw_path: &str,
    extra_locations: &[PathBuf],
) -> Option<LocatedFile> {
    if raw_path.is_empty() {
        return None;
    }
    let file_name = base_file_name(raw_path);
    if file_name.is_empty() {
        return None;
    }

    let mut candidates: Vec<PathBuf> = Vec::with_capacity(4 + extra_locations.len());
    if is_absolute_media_path(raw_path) {
        candidates.push(PathBuf::from(raw_path));
    }
    candidates.push(config.media_root.join(file_name));
    candidates.push(config.media_root.join("imported").join(file_name));
    candidates.push(config.project_base.join("media").join(file_name));
    for location in extra_locations {
        candidates.push(location.join(file_name));
    }

    for (rank, candidate) in candidates.into_iter().enumerate() {
        if is_regular_file(&candidate) {
            debug!(
                "Located media file for {:?} at {} (candidate {})",
                raw_path,
                candidate.display(),
                rank
            );
            return Some(LocatedFile {
                path: candidate,
                candidate_rank: rank,
            });
        }
    }

    debug!("No media file found for {:?}", raw_path);
    None
}

/// Regular-file check that does not follow symlinks
pub(crate) fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false)
}
