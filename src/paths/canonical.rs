//! Canonical store paths
//!
//! A [`CanonicalPath`] is the form under which a stored file is recorded by
//! the persistence layer: relative to the managed root, forward-slash
//! separated, free of `.`/`..` segments, and rooted in one of the permitted
//! subfolders. Joining a canonical path onto the managed root therefore
//! always lands inside it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// A validated path relative to the managed root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Parse a stored path string, enforcing the canonical form against the
    /// permitted subfolder list
    pub fn parse(raw: &str, permitted_subfolders: &[String]) -> Result<Self, StoreError> {
        if raw.is_empty() {
            return Err(StoreError::InvalidPath("empty path".to_string()));
        }
        if raw.contains('\\') {
            return Err(StoreError::InvalidPath(format!(
                "backslash separator in: {}",
                raw
            )));
        }
        if raw.starts_with('/') {
            return Err(StoreError::InvalidPath(format!("absolute path: {}", raw)));
        }
        let mut segments = raw.split('/');
        let subfolder = segments.next().unwrap_or_default();
        if !permitted_subfolders.iter().any(|s| s == subfolder) {
            return Err(StoreError::InvalidSubfolder(subfolder.to_string()));
        }
        let mut saw_file = false;
        for segment in segments {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(StoreError::InvalidPath(format!(
                    "unsafe segment in: {}",
                    raw
                )));
            }
            saw_file = true;
        }
        if !saw_file {
            return Err(StoreError::InvalidPath(format!(
                "no filename component in: {}",
                raw
            )));
        }
        Ok(CanonicalPath(raw.to_string()))
    }

    /// Compose a canonical path from an already-validated subfolder and an
    /// already-sanitized filename
    pub(crate) fn from_parts(subfolder: &str, file_name: &str) -> Self {
        CanonicalPath(format!("{}/{}", subfolder, file_name))
    }

    /// Compose from path segments already known to live under the managed
    /// root, as produced by a filesystem walk
    pub(crate) fn from_segments(segments: &[&str]) -> Self {
        CanonicalPath(segments.join("/"))
    }

    /// Replace the filename component, keeping any directory part
    pub(crate) fn with_file_name(&self, file_name: &str) -> Self {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => CanonicalPath(format!("{}/{}", parent, file_name)),
            None => CanonicalPath(file_name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First segment: the store subfolder this path lives in
    pub fn subfolder(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// Last segment: the filename
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Join onto the managed root. Safe by construction: the canonical form
    /// admits no `..` segments or absolute components.
    pub fn to_absolute(&self, media_root: &Path) -> PathBuf {
        let mut path = media_root.to_path_buf();
        for segment in self.0.split('/') {
            path.push(segment);
        }
        path
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
