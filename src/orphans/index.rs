//! Reference index collaborators
//!
//! The persistence layer owns the set of canonical paths that domain
//! records still point at; the scanner only ever queries it. The trait is
//! the seam, [`FileReferenceIndex`] is the concrete implementation used by
//! the maintenance CLI, where the web application exports its references as
//! a newline-delimited file.

use std::collections::HashSet;
use std::fs;

use crate::error::IndexError;
use crate::paths::CanonicalPath;

/// Query surface of the persistence collaborator
pub trait ReferenceIndex {
    /// Every canonical path currently referenced by a domain record
    fn referenced_paths(&self) -> Result<HashSet<CanonicalPath>, IndexError>;
}

/// Reference index backed by a newline-delimited file of canonical paths.
///
/// Blank lines and `#` comments are ignored. Malformed entries are a hard
/// error: this input gates deletion, so a half-readable file must not be
/// treated as a shorter reference list.
pub struct FileReferenceIndex {
    path: std::path::PathBuf,
    permitted_subfolders: Vec<String>,
}

impl FileReferenceIndex {
    pub fn new(path: impl Into<std::path::PathBuf>, permitted_subfolders: Vec<String>) -> Self {
        Self {
            path: path.into(),
            permitted_subfolders,
        }
    }
}

impl ReferenceIndex for FileReferenceIndex {
    fn referenced_paths(&self) -> Result<HashSet<CanonicalPath>, IndexError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            IndexError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let mut paths = HashSet::new();
        for (number, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parsed = CanonicalPath::parse(line, &self.permitted_subfolders).map_err(|e| {
                IndexError::Corrupt(format!(
                    "{} line {}: {}",
                    self.path.display(),
                    number + 1,
                    e
                ))
            })?;
            paths.insert(parsed);
        }
        Ok(paths)
    }
}
