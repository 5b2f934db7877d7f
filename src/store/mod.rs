//! Managed media store
//!
//! Filesystem operations against the managed root: locating files referenced
//! by imported data, copying them into the store, duplicate handling,
//! validation, and permission management. [`MediaStore`] bundles the
//! operations around one explicit configuration value.

pub mod copy;
pub mod duplicates;
pub mod locate;
pub mod permissions;
pub mod results;
pub mod validation;

pub use copy::{CopyOptions, copy_to_store};
pub use duplicates::resolve_duplicate;
pub use locate::locate_media_file;
pub use permissions::{PermissionPolicy, fix_permissions, mode_string};
pub use results::{CopyOutcome, FixReport, LocatedFile, StoredFile, Validation};
pub use validation::validate_media_file;

use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::error::{ScanError, StoreError};
use crate::orphans::{self, DeleteReport, OrphanReport, ReferenceIndex};
use crate::paths::{CanonicalPath, NormalizedPath, normalize_media_path};

/// Media store bound to one managed root.
///
/// Construction takes the configuration as an explicit value, so tests and
/// embedding applications can run isolated stores against disposable roots.
pub struct MediaStore {
    config: MediaConfig,
}

impl MediaStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Normalize a raw media path into a canonical store path
    pub fn normalize(
        &self,
        raw_path: &str,
        subfolder: &str,
        create_dirs: bool,
    ) -> Result<NormalizedPath, StoreError> {
        normalize_media_path(&self.config, raw_path, subfolder, create_dirs)
    }

    /// Search the candidate directories for the file behind a raw reference
    pub fn locate(&self, raw_path: &str, extra_locations: &[PathBuf]) -> Option<LocatedFile> {
        locate_media_file(&self.config, raw_path, extra_locations)
    }

    /// Find a free name for the desired path, probing duplicate suffixes up
    /// to the configured attempt limit
    pub fn resolve_duplicate(&self, desired: &CanonicalPath) -> Result<CanonicalPath, StoreError> {
        duplicates::resolve_duplicate(&self.config, desired, self.config.max_duplicate_attempts)
    }

    /// Copy a source file into a subfolder of the store
    pub fn copy_to_store(
        &self,
        source_path: &Path,
        subfolder: &str,
        options: &CopyOptions,
    ) -> Result<CopyOutcome, StoreError> {
        copy_to_store(&self.config, source_path, subfolder, options)
    }

    /// Run the safety checks on a resolved media path
    pub fn validate(&self, path: &Path) -> Validation {
        validate_media_file(&self.config, path)
    }

    /// Apply the configured permission policy to a store subfolder
    pub fn fix_permissions(&self, subfolder: &str) -> Result<FixReport, StoreError> {
        self.fix_permissions_with(subfolder, &PermissionPolicy::from_config(&self.config))
    }

    /// Apply an explicit permission policy to a store subfolder
    pub fn fix_permissions_with(
        &self,
        subfolder: &str,
        policy: &PermissionPolicy,
    ) -> Result<FixReport, StoreError> {
        fix_permissions(&self.config, subfolder, policy)
    }

    /// Report files under a subfolder with no referencing domain record
    pub fn find_orphans(
        &self,
        subfolder: &str,
        index: &dyn ReferenceIndex,
    ) -> Result<OrphanReport, ScanError> {
        orphans::find_orphans(&self.config, subfolder, index)
    }

    /// Delete the files named by an orphan report
    pub fn delete_orphans(&self, report: &OrphanReport) -> Result<DeleteReport, ScanError> {
        orphans::delete_orphans(&self.config, report)
    }

    /// Public URL for a stored file
    pub fn url_for(&self, path: &CanonicalPath) -> String {
        let prefix = self.config.media_url.trim_end_matches('/');
        format!("{}/{}", prefix, path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_the_configured_prefix() {
        let store = MediaStore::new(MediaConfig::with_root("/srv/media"));
        let path =
            CanonicalPath::parse("imported/photo.jpg", &store.config().subfolders).unwrap();
        assert_eq!(store.url_for(&path), "/media/imported/photo.jpg");

        let mut config = MediaConfig::with_root("/srv/media");
        config.media_url = "https://example.org/media".to_string();
        let store = MediaStore::new(config);
        assert_eq!(
            store.url_for(&path),
            "https://example.org/media/imported/photo.jpg"
        );
    }
}
