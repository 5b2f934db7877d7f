//! Path handling
//!
//! Canonical store paths plus the sanitization and normalization applied to
//! raw paths coming out of a Gramps export.

pub mod canonical;
pub mod normalize;
pub mod sanitize;

pub use canonical::CanonicalPath;
pub use normalize::{NormalizedPath, base_file_name, is_absolute_media_path, normalize_media_path};
pub use sanitize::{FALLBACK_FILENAME, sanitize_filename};
