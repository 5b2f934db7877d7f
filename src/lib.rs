//! Media-store reconciliation core for Gramps imports.
//!
//! Reconciles media references from a Gramps export (arbitrary, possibly
//! foreign-OS paths) with a managed, sandboxed storage area: locating the
//! real file, copying it under a safe canonical name, validating resolved
//! paths, and finding files no record references anymore. Persistence and
//! the web layer are external collaborators; this crate only touches the
//! filesystem.

pub mod config;
pub mod error;
pub mod orphans;
pub mod paths;
pub mod store;

pub use config::MediaConfig;
pub use error::MediaStoreError;
pub use paths::CanonicalPath;
pub use store::MediaStore;
