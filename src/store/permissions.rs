//! Store permissions
//!
//! Applies the configured permission policy to stored files and the
//! directories holding them. Modes matter on Unix, where the web server
//! serving the media runs as a different user than the import job; on other
//! platforms mode application is a no-op.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::MediaConfig;
use crate::error::StoreError;
use crate::store::results::FixReport;

/// Directory and file modes applied to stored media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionPolicy {
    pub dir_mode: u32,
    pub file_mode: u32,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        // owner read/write, world read, traverse for directories
        Self {
            dir_mode: 0o755,
            file_mode: 0o644,
        }
    }
}

impl PermissionPolicy {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            dir_mode: config.dir_mode,
            file_mode: config.file_mode,
        }
    }
}

#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub(crate) fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Walk a store subfolder applying the policy to every directory and file.
///
/// Creates the subfolder if missing, leaves symlinks and other specials
/// untouched, and finishes with a write probe so the caller learns whether
/// the import job can actually store files there.
pub fn fix_permissions(
    config: &MediaConfig,
    subfolder: &str,
    policy: &PermissionPolicy,
) -> Result<FixReport, StoreError> {
    if !config.is_permitted_subfolder(subfolder) {
        return Err(StoreError::InvalidSubfolder(subfolder.to_string()));
    }
    let subfolder_root = config.subfolder_root(subfolder);
    fs::create_dir_all(&subfolder_root)?;

    let mut report = FixReport::default();
    set_mode(&subfolder_root, policy.dir_mode)?;
    report.directories += 1;

    for entry in WalkDir::new(&subfolder_root).min_depth(1) {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            set_mode(entry.path(), policy.dir_mode)?;
            report.directories += 1;
        } else if file_type.is_file() {
            set_mode(entry.path(), policy.file_mode)?;
            report.files += 1;
        } else {
            warn!(
                "Leaving non-regular entry untouched: {}",
                entry.path().display()
            );
            report.skipped += 1;
        }
    }

    report.writable = probe_writable(&subfolder_root);
    info!(
        "Fixed permissions under {}: {} directories, {} files, writable: {}",
        subfolder_root.display(),
        report.directories,
        report.files,
        report.writable
    );
    Ok(report)
}

/// Confirm writability by creating and removing a probe file
fn probe_writable(directory: &Path) -> bool {
    let probe = directory.join(".permissions_probe");
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

/// Render a mode as an `rwxr-xr-x` style string for operator output
pub fn mode_string(mode: u32) -> String {
    let mut out = String::with_capacity(9);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn mode_strings_render_rwx_triplets() {
        assert_eq!(mode_string(0o755), "rwxr-xr-x");
        assert_eq!(mode_string(0o644), "rw-r--r--");
        assert_eq!(mode_string(0o000), "---------");
        assert_eq!(mode_string(0o777), "rwxrwxrwx");
    }

    #[test]
    fn fix_creates_the_subfolder_and_reports_writable() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path().join("media"));
        let report = fix_permissions(&config, "imported", &PermissionPolicy::default()).unwrap();
        assert_eq!(report.directories, 1);
        assert_eq!(report.files, 0);
        assert!(report.writable);
        assert!(config.media_root.join("imported").is_dir());
    }

    #[test]
    fn unknown_subfolder_is_rejected() {
        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path().join("media"));
        let result = fix_permissions(&config, "secret", &PermissionPolicy::default());
        assert!(matches!(result, Err(StoreError::InvalidSubfolder(_))));
    }

    #[cfg(unix)]
    #[test]
    fn walk_applies_modes_to_nested_entries() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let config = MediaConfig::with_root(dir.path().join("media"));
        let nested = config.media_root.join("imported").join("2024");
        fs::create_dir_all(&nested).unwrap();
        let file = nested.join("photo.jpg");
        fs::File::create(&file).unwrap().write_all(b"x").unwrap();
        set_mode(&file, 0o600).unwrap();
        set_mode(&nested, 0o700).unwrap();

        let report = fix_permissions(&config, "imported", &PermissionPolicy::default()).unwrap();
        assert_eq!(report.directories, 2);
        assert_eq!(report.files, 1);

        let file_mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o644);
        let dir_mode = fs::metadata(&nested).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o755);
    }
}
