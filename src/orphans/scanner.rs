//! Orphan detection
//!
//! Set difference between the files on disk under a store subfolder and the
//! canonical paths the persistence layer still references. Scanning is
//! read-only; deletion is a separate explicit step so nothing destructive
//! can happen by default.

use log::{debug, error, info, warn};
use std::fs;
use std::io;
use walkdir::WalkDir;

use crate::config::MediaConfig;
use crate::error::ScanError;
use crate::orphans::ReferenceIndex;
use crate::orphans::results::{DeleteReport, OrphanReport};
use crate::paths::CanonicalPath;

/// List files under `media_root/subfolder` that no domain record references.
///
/// The report is sorted lexicographically for reproducible output. A missing
/// subfolder yields an empty report rather than an error.
pub fn find_orphans(
    config: &MediaConfig,
    subfolder: &str,
    index: &dyn ReferenceIndex,
) -> Result<OrphanReport, ScanError> {
    if !config.is_permitted_subfolder(subfolder) {
        return Err(ScanError::InvalidSubfolder(subfolder.to_string()));
    }

    let subfolder_root = config.subfolder_root(subfolder);
    if !subfolder_root.is_dir() {
        debug!(
            "Orphan scan target does not exist yet: {}",
            subfolder_root.display()
        );
        return Ok(OrphanReport {
            subfolder: subfolder.to_string(),
            orphans: Vec::new(),
            scanned: 0,
        });
    }

    let referenced = index.referenced_paths()?;

    let mut orphans = Vec::new();
    let mut scanned = 0usize;
    for entry in WalkDir::new(&subfolder_root).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        scanned += 1;
        let relative = entry
            .path()
            .strip_prefix(&config.media_root)
            .map_err(|_| ScanError::IoError(io::Error::other("walk escaped the managed root")))?;
        let Some(canonical) = canonical_from_relative(relative) else {
            warn!(
                "Skipping file with non-representable name: {}",
                entry.path().display()
            );
            continue;
        };
        if !referenced.contains(&canonical) {
            orphans.push(canonical);
        }
    }
    orphans.sort();

    info!(
        "Orphan scan of {}: {} files scanned, {} orphaned",
        subfolder_root.display(),
        scanned,
        orphans.len()
    );
    Ok(OrphanReport {
        subfolder: subfolder.to_string(),
        orphans,
        scanned,
    })
}

/// Delete the files named by an orphan report.
///
/// Failures are isolated per file: an undeletable orphan is logged and
/// counted, and the remaining files are still processed.
pub fn delete_orphans(
    config: &MediaConfig,
    report: &OrphanReport,
) -> Result<DeleteReport, ScanError> {
    if !config.is_permitted_subfolder(&report.subfolder) {
        return Err(ScanError::InvalidSubfolder(report.subfolder.clone()));
    }

    let mut outcome = DeleteReport::default();
    for orphan in &report.orphans {
        let absolute = orphan.to_absolute(&config.media_root);
        match fs::remove_file(&absolute) {
            Ok(()) => {
                info!("Deleted orphaned media file {}", orphan);
                outcome.deleted += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Orphan already gone: {}", orphan);
                outcome.missing += 1;
            }
            Err(e) => {
                error!("Failed to delete orphan {}: {}", orphan, e);
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}

/// Rebuild a canonical path from a walk entry relative to the managed root
fn canonical_from_relative(relative: &std::path::Path) -> Option<CanonicalPath> {
    let mut segments = Vec::new();
    for component in relative.components() {
        segments.push(component.as_os_str().to_str()?);
    }
    if segments.len() < 2 {
        return None;
    }
    Some(CanonicalPath::from_segments(&segments))
}
