//! Orphan scan result types

use crate::paths::CanonicalPath;

/// Result of an orphan scan over one store subfolder
#[derive(Debug, Clone)]
pub struct OrphanReport {
    pub subfolder: String,
    /// Files on disk with no referencing record, lexicographically sorted
    pub orphans: Vec<CanonicalPath>,
    /// Total files seen on disk during the scan
    pub scanned: usize,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orphans.len()
    }
}

/// Result of deleting the files named by an orphan report
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    pub deleted: usize,
    /// Orphans already gone by deletion time
    pub missing: usize,
    /// Deletions that failed; the affected files are left in place
    pub failed: usize,
}
