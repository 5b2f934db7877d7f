//! Store result types
//!
//! Defines result structures returned by store operations. Routine
//! non-success outcomes (missing source, failed validation) live here as
//! values rather than errors.

use std::path::PathBuf;

use crate::paths::CanonicalPath;

/// Outcome of a copy into the managed store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// File materialized under the managed root
    Stored(StoredFile),
    /// Source path missing or not a regular file; frequent with incomplete
    /// exports, the caller keeps the original reference unresolved
    SourceMissing,
}

/// A file successfully materialized in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path to persist for the domain record
    pub path: CanonicalPath,
    /// True when a duplicate suffix was applied to avoid a collision
    pub renamed: bool,
}

impl CopyOutcome {
    /// Stored path, if the copy happened
    pub fn stored_path(&self) -> Option<&CanonicalPath> {
        match self {
            CopyOutcome::Stored(stored) => Some(&stored.path),
            CopyOutcome::SourceMissing => None,
        }
    }
}

/// Result of validating a resolved media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    /// Empty when valid, otherwise the first failed check
    pub reason: String,
}

impl Validation {
    pub(crate) fn ok() -> Self {
        Validation {
            is_valid: true,
            reason: String::new(),
        }
    }

    pub(crate) fn fail(reason: &str) -> Self {
        Validation {
            is_valid: false,
            reason: reason.to_string(),
        }
    }
}

/// Result of a permission repair walk
#[derive(Debug, Clone, Default)]
pub struct FixReport {
    pub directories: usize,
    pub files: usize,
    /// Entries left untouched (symlinks and other specials)
    pub skipped: usize,
    /// Whether the subfolder root accepted a write probe afterwards
    pub writable: bool,
}

/// A file found by the locator search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
    pub path: PathBuf,
    /// Index into the candidate list that matched, lower is higher priority
    pub candidate_rank: usize,
}
