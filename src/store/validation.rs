//! Media file validation
//!
//! Safety checks applied to a resolved media path before it is served or
//! recorded. Failures are routine for stale or tampered references, so the
//! result is a value, never an error. Checks run in a fixed order and stop
//! at the first failure.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::store::results::Validation;

/// Validate a media file against the managed root.
///
/// Relative paths are joined onto the managed root first. Checks, in order:
/// existence, regular file, containment of the fully resolved path under
/// the managed root, size limit, readability. Containment uses the
/// canonicalized path so `..` segments and symlink indirection cannot
/// escape the root.
pub fn validate_media_file(config: &MediaConfig, path: &Path) -> Validation {
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.media_root.join(path)
    };

    let meta = match fs::symlink_metadata(&absolute) {
        Ok(meta) => meta,
        Err(_) => return Validation::fail("does not exist"),
    };

    if !meta.file_type().is_file() {
        return Validation::fail("not a regular file");
    }

    let root = match config.absolute_media_root() {
        Ok(root) => root,
        // containment cannot be proven without a resolvable root
        Err(_) => return Validation::fail("path traversal detected"),
    };
    let resolved = match absolute.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => return Validation::fail("does not exist"),
    };
    if !resolved.starts_with(&root) {
        debug!(
            "Rejected media path outside managed root: {} resolves to {}",
            absolute.display(),
            resolved.display()
        );
        return Validation::fail("path traversal detected");
    }

    if meta.len() > config.max_file_size {
        return Validation::fail("exceeds size limit");
    }

    if fs::File::open(&resolved).is_err() {
        return Validation::fail("not readable");
    }

    Validation::ok()
}
