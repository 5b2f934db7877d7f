//! Copying into the managed store
//!
//! Materializes a source file under the managed root: normalize the name,
//! stage the bytes next to the destination, claim the final name with an
//! exclusive create, then rename the staged copy over the claim. The rename
//! happens inside one directory, so an interrupted copy never leaves a
//! partial file at the final name.

use log::{error, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::error::StoreError;
use crate::paths::{CanonicalPath, normalize_media_path};
use crate::store::duplicates;
use crate::store::permissions::set_mode;
use crate::store::results::{CopyOutcome, StoredFile};

/// Options for a copy into the store
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Walk duplicate suffixes instead of failing on a taken name
    pub handle_duplicates: bool,
    /// Apply the configured file and directory modes afterwards
    pub set_permissions: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            handle_duplicates: true,
            set_permissions: true,
        }
    }
}

/// Copy a source file into a subfolder of the managed store.
///
/// A missing or non-regular source is a routine outcome reported as
/// [`CopyOutcome::SourceMissing`]; infrastructure failures (permissions,
/// disk full) surface as errors. An existing file is never overwritten
/// under its original name.
pub fn copy_to_store(
    config: &MediaConfig,
    source_path: &Path,
    subfolder: &str,
    options: &CopyOptions,
) -> Result<CopyOutcome, StoreError> {
    match fs::symlink_metadata(source_path) {
        Ok(meta) if meta.file_type().is_file() => {}
        _ => {
            warn!(
                "Copy source missing or not a regular file: {}",
                source_path.display()
            );
            return Ok(CopyOutcome::SourceMissing);
        }
    }

    let raw_name = source_path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let normalized = normalize_media_path(config, raw_name, subfolder, true)?;
    let desired = normalized.path;
    let destination_dir = config.subfolder_root(desired.subfolder());

    let staged = stage_source(&destination_dir, desired.file_name(), source_path)?;

    let claimed = match claim_destination(config, &desired, options.handle_duplicates) {
        Ok(claimed) => claimed,
        Err(e) => {
            let _ = fs::remove_file(&staged);
            return Err(e);
        }
    };
    let final_path = claimed.to_absolute(&config.media_root);

    // rename over our own placeholder; atomic within the directory
    if let Err(e) = fs::rename(&staged, &final_path) {
        error!(
            "Failed to move staged copy into place at {}: {}",
            final_path.display(),
            e
        );
        let _ = fs::remove_file(&staged);
        let _ = fs::remove_file(&final_path);
        return Err(StoreError::from(e));
    }

    if options.set_permissions {
        set_mode(&final_path, config.file_mode)?;
        // only the immediate directory; it may have just been created
        set_mode(&destination_dir, config.dir_mode)?;
    }

    let renamed = claimed != desired;
    if renamed {
        info!(
            "Stored {} as {} (duplicate of {})",
            source_path.display(),
            claimed,
            desired
        );
    } else {
        info!("Stored {} as {}", source_path.display(), claimed);
    }

    Ok(CopyOutcome::Stored(StoredFile {
        path: claimed,
        renamed,
    }))
}

/// Write the source bytes to a hidden `.part` file in the destination
/// directory, so the final rename stays on one filesystem
fn stage_source(
    destination_dir: &Path,
    file_name: &str,
    source_path: &Path,
) -> Result<PathBuf, StoreError> {
    let mut reader = fs::File::open(source_path)?;
    for attempt in 0u32..64 {
        let staged_name = if attempt == 0 {
            format!(".{}.part", file_name)
        } else {
            format!(".{}.{}.part", file_name, attempt)
        };
        let staged_path = destination_dir.join(staged_name);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staged_path)
        {
            Ok(mut writer) => {
                if let Err(e) = io::copy(&mut reader, &mut writer) {
                    drop(writer);
                    let _ = fs::remove_file(&staged_path);
                    return Err(StoreError::from(e));
                }
                return Ok(staged_path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StoreError::from(e)),
        }
    }
    Err(StoreError::IoError(io::Error::other(
        "no free staging name in destination directory",
    )))
}

/// Reserve the final name with an exclusive create. `create_new` is the
/// atomic check-and-claim: two importers racing on the same name get
/// distinct suffixes because only one create succeeds per candidate.
fn claim_destination(
    config: &MediaConfig,
    desired: &CanonicalPath,
    handle_duplicates: bool,
) -> Result<CanonicalPath, StoreError> {
    let max_attempts = if handle_duplicates {
        config.max_duplicate_attempts
    } else {
        0
    };
    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            desired.clone()
        } else {
            duplicates::suffixed(desired, attempt)
        };
        let absolute = candidate.to_absolute(&config.media_root);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&absolute)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if attempt >= max_attempts {
                    return Err(if handle_duplicates {
                        StoreError::NamespaceExhausted(desired.to_string())
                    } else {
                        StoreError::FileAlreadyExists(desired.to_string())
                    });
                }
                attempt += 1;
            }
            Err(e) => return Err(StoreError::from(e)),
        }
    }
}
