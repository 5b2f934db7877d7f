//! Media store configuration
//!
//! Holds the managed-root location, the permitted subfolders, size limits,
//! and default permission modes. Configuration is an explicit value passed
//! into the store at construction time so tests can run against disposable
//! roots; `load` reads an optional `media-store.toml` plus `MEDIA_STORE_*`
//! environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Default maximum accepted file size (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Default upper bound on duplicate-suffix probing
pub const DEFAULT_MAX_DUPLICATE_ATTEMPTS: u32 = 9999;

/// Media store configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Managed root directory; every stored file lives below it
    pub media_root: PathBuf,
    /// Project base directory, searched as `<project_base>/media` when
    /// locating files referenced by an import
    pub project_base: PathBuf,
    /// URL prefix mapped onto the managed root by the web server
    pub media_url: String,
    /// Subfolders of the managed root that may hold stored files
    pub subfolders: Vec<String>,
    pub max_file_size: u64,
    /// Directory mode, octal string in configuration sources (e.g. "755")
    #[serde(deserialize_with = "octal_mode")]
    pub dir_mode: u32,
    /// File mode, octal string in configuration sources (e.g. "644")
    #[serde(deserialize_with = "octal_mode")]
    pub file_mode: u32,
    pub max_duplicate_attempts: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("./media"),
            project_base: PathBuf::from("."),
            media_url: "/media/".to_string(),
            subfolders: vec!["imported".to_string(), "uploads".to_string()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            dir_mode: 0o755,
            file_mode: 0o644,
            max_duplicate_attempts: DEFAULT_MAX_DUPLICATE_ATTEMPTS,
        }
    }
}

impl MediaConfig {
    /// Load configuration from `media-store.toml` (if present) and the
    /// `MEDIA_STORE_*` environment
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("media-store").required(false))
            .add_source(Environment::with_prefix("MEDIA_STORE"))
            .build()?;
        settings.try_deserialize()
    }

    /// Check whether a subfolder name is one of the permitted store areas
    pub fn is_permitted_subfolder(&self, subfolder: &str) -> bool {
        self.subfolders.iter().any(|s| s == subfolder)
    }

    /// Absolute path of a subfolder under the managed root
    pub fn subfolder_root(&self, subfolder: &str) -> PathBuf {
        self.media_root.join(subfolder)
    }

    /// Get the managed root as a display string
    pub fn media_root_str(&self) -> String {
        self.media_root.to_string_lossy().to_string()
    }

    /// Get the absolute, symlink-free path of the managed root
    pub fn absolute_media_root(&self) -> std::io::Result<PathBuf> {
        self.media_root.canonicalize()
    }

    /// Configuration for tests and embedding callers that already know the
    /// managed root; all other fields keep their defaults
    pub fn with_root(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            ..Self::default()
        }
    }

    /// Project base override, used by the locator search list
    pub fn with_project_base(mut self, project_base: impl Into<PathBuf>) -> Self {
        self.project_base = project_base.into();
        self
    }
}

/// Deserialize a permission mode given as an octal string
fn octal_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    u32::from_str_radix(&raw, 8).map_err(serde::de::Error::custom)
}

/// Parse an octal mode string from the command line
pub fn parse_octal_mode(raw: &str) -> Option<u32> {
    u32::from_str_radix(raw, 8).ok().filter(|m| *m <= 0o777)
}
