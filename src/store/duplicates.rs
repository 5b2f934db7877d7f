//! Duplicate name resolution
//!
//! Finds a free name when the desired canonical path is already taken,
//! probing `stem_1.ext`, `stem_2.ext`, and so on. The answer is advisory:
//! between the existence probe here and the eventual write, another importer
//! may take the name. The copier closes that race with an exclusive create
//! and walks further suffixes itself, so callers that go through
//! [`copy_to_store`](crate::store::copy_to_store) never clobber each other.

use crate::config::MediaConfig;
use crate::error::StoreError;
use crate::paths::CanonicalPath;

/// Return the desired path if free, otherwise the first suffixed variant
/// that does not exist on disk.
///
/// Fails with [`StoreError::NamespaceExhausted`] when every suffix up to
/// `max_attempts` collides.
pub fn resolve_duplicate(
    config: &MediaConfig,
    desired: &CanonicalPath,
    max_attempts: u32,
) -> Result<CanonicalPath, StoreError> {
    if !desired.to_absolute(&config.media_root).exists() {
        return Ok(desired.clone());
    }
    for attempt in 1..=max_attempts {
        let candidate = suffixed(desired, attempt);
        if !candidate.to_absolute(&config.media_root).exists() {
            return Ok(candidate);
        }
    }
    Err(StoreError::NamespaceExhausted(desired.to_string()))
}

/// Build the `stem_N.ext` variant of a canonical path
pub(crate) fn suffixed(path: &CanonicalPath, attempt: u32) -> CanonicalPath {
    let (stem, extension) = split_extension(path.file_name());
    path.with_file_name(&format!("{}_{}{}", stem, attempt, extension))
}

/// Split a filename into stem and extension (dot included). A leading dot
/// marks a hidden file, not an extension.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 => file_name.split_at(index),
        _ => (file_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn canonical(raw: &str) -> CanonicalPath {
        CanonicalPath::parse(raw, &["imported".to_string(), "uploads".to_string()]).unwrap()
    }

    #[test]
    fn free_name_is_returned_unchanged() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        let desired = canonical("imported/photo.jpg");
        let resolved = resolve_duplicate(&config, &desired, 9999).unwrap();
        assert_eq!(resolved, desired);
    }

    #[test]
    fn taken_names_walk_the_suffix_sequence() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        std::fs::create_dir_all(dir.path().join("imported")).unwrap();
        File::create(dir.path().join("imported/photo.jpg")).unwrap();

        let desired = canonical("imported/photo.jpg");
        let resolved = resolve_duplicate(&config, &desired, 9999).unwrap();
        assert_eq!(resolved.as_str(), "imported/photo_1.jpg");

        File::create(dir.path().join("imported/photo_1.jpg")).unwrap();
        let resolved = resolve_duplicate(&config, &desired, 9999).unwrap();
        assert_eq!(resolved.as_str(), "imported/photo_2.jpg");
    }

    #[test]
    fn returned_names_are_distinct_and_free() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        std::fs::create_dir_all(dir.path().join("imported")).unwrap();
        let desired = canonical("imported/photo.jpg");

        let mut seen = std::collections::HashSet::new();
        for _ in 0..20 {
            let resolved = resolve_duplicate(&config, &desired, 9999).unwrap();
            let absolute = resolved.to_absolute(&config.media_root);
            assert!(!absolute.exists(), "{} already existed", resolved);
            assert!(seen.insert(resolved.clone()), "{} repeated", resolved);
            File::create(absolute).unwrap();
        }
    }

    #[test]
    fn exhaustion_is_an_error() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path());
        std::fs::create_dir_all(dir.path().join("imported")).unwrap();
        for name in ["photo.jpg", "photo_1.jpg", "photo_2.jpg"] {
            File::create(dir.path().join("imported").join(name)).unwrap();
        }

        let desired = canonical("imported/photo.jpg");
        let result = resolve_duplicate(&config, &desired, 2);
        assert!(matches!(result, Err(StoreError::NamespaceExhausted(_))));
    }

    #[test]
    fn extensionless_and_hidden_names_get_suffixes_too() {
        let desired = canonical("imported/README");
        assert_eq!(suffixed(&desired, 1).as_str(), "imported/README_1");

        let hidden = canonical("imported/.htaccess");
        assert_eq!(suffixed(&hidden, 3).as_str(), "imported/.htaccess_3");

        let tarball = canonical("imported/archive.tar.gz");
        assert_eq!(suffixed(&tarball, 2).as_str(), "imported/archive.tar_2.gz");
    }
}
