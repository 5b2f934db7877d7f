//! Media path normalization
//!
//! Converts raw paths recorded by a Gramps export into canonical store
//! paths. Imported data may carry POSIX or Windows absolute paths from the
//! machine the export was made on; only the filename survives, since the
//! managed store is flat per subfolder.

use log::debug;
use std::fs;

use crate::config::MediaConfig;
use crate::error::StoreError;
use crate::paths::canonical::CanonicalPath;
use crate::paths::sanitize::sanitize_filename;

/// Outcome of normalizing a raw media path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    pub path: CanonicalPath,
    /// True when the raw path was absolute under any OS convention
    pub was_absolute: bool,
}

/// Detect absoluteness under POSIX (`/...`), Windows drive (`C:\...` or
/// `C:/...`), and UNC (`\\host\...`) conventions
pub fn is_absolute_media_path(raw: &str) -> bool {
    if raw.starts_with('/') || raw.starts_with("\\\\") {
        return true;
    }
    let mut chars = raw.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('/' | '\\')) if drive.is_ascii_alphabetic()
    )
}

/// Extract the base filename, honouring both separator conventions
pub fn base_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).find(|s| !s.is_empty()).unwrap_or("")
}

/// Normalize a raw media path into `subfolder/sanitized_name`.
///
/// Malformed raw paths never fail; the worst case is the sanitizer's
/// fallback filename. `create_dirs` ensures the subfolder exists under the
/// managed root, tolerating concurrent creation by other importers. The only
/// errors are an unknown subfolder and directory-creation I/O failures.
pub fn normalize_media_path(
    config: &MediaConfig,
    raw_path: &str,
    subfolder: &str,
    create_dirs: bool,
) -> Result<NormalizedPath, StoreError> {
    if !config.is_permitted_subfolder(subfolder) {
        return Err(StoreError::InvalidSubfolder(subfolder.to_string()));
    }

    let was_absolute = is_absolute_media_path(raw_path);
    let file_name = sanitize_filename(base_file_name(raw_path));
    let path = CanonicalPath::from_parts(subfolder, &file_name);

    if create_dirs {
        // create_dir_all succeeds when the directory already exists, so two
        // importers racing on a fresh subfolder both come through
        fs::create_dir_all(config.subfolder_root(subfolder))?;
    }

    debug!(
        "Normalized media path {:?} -> {} (absolute: {})",
        raw_path, path, was_absolute
    );

    Ok(NormalizedPath { path, was_absolute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn detects_absolute_conventions() {
        assert!(is_absolute_media_path("/home/user/photo.jpg"));
        assert!(is_absolute_media_path("C:\\Users\\user\\photo.jpg"));
        assert!(is_absolute_media_path("c:/users/photo.jpg"));
        assert!(is_absolute_media_path("\\\\server\\share\\photo.jpg"));
        assert!(!is_absolute_media_path("photos/vacation.jpg"));
        assert!(!is_absolute_media_path("photo.jpg"));
        assert!(!is_absolute_media_path(""));
    }

    #[test]
    fn base_file_name_handles_both_separators() {
        assert_eq!(base_file_name("/home/user/photo.jpg"), "photo.jpg");
        assert_eq!(base_file_name("C:\\Users\\user\\photo.jpg"), "photo.jpg");
        assert_eq!(base_file_name("photos/vacation.jpg"), "vacation.jpg");
        assert_eq!(base_file_name("photo.jpg"), "photo.jpg");
        assert_eq!(base_file_name("photos/"), "photos");
        assert_eq!(base_file_name(""), "");
    }

    #[test]
    fn windows_export_path_round_trip() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        let normalized = normalize_media_path(
            &config,
            "C:\\Users\\bob\\photos\\wedding (1).jpg",
            "imported",
            true,
        )
        .unwrap();
        assert_eq!(normalized.path.as_str(), "imported/wedding_1.jpg");
        assert!(normalized.was_absolute);
        assert!(dir.path().join("imported").is_dir());
    }

    #[test]
    fn relative_path_keeps_only_the_filename() {
        let config = MediaConfig::with_root("/nonexistent");
        let normalized =
            normalize_media_path(&config, "photos/family reunion.JPG", "uploads", false).unwrap();
        assert_eq!(normalized.path.as_str(), "uploads/family_reunion.JPG");
        assert!(!normalized.was_absolute);
    }

    #[test]
    fn malformed_input_falls_back_instead_of_failing() {
        let config = MediaConfig::with_root("/nonexistent");
        let normalized = normalize_media_path(&config, "///", "imported", false).unwrap();
        assert_eq!(normalized.path.as_str(), "imported/file");
        assert!(normalized.was_absolute);
    }

    #[test]
    fn unknown_subfolder_is_rejected() {
        let config = MediaConfig::with_root("/nonexistent");
        let result = normalize_media_path(&config, "photo.jpg", "secret", false);
        assert!(matches!(result, Err(StoreError::InvalidSubfolder(_))));
    }

    #[test]
    fn create_dirs_is_idempotent() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        normalize_media_path(&config, "a.jpg", "imported", true).unwrap();
        normalize_media_path(&config, "b.jpg", "imported", true).unwrap();
        assert!(dir.path().join("imported").is_dir());
    }
}
