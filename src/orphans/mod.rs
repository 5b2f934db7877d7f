//! Orphaned media management
//!
//! Detects files in the managed store that no domain record references and
//! deletes them on explicit request. Scanning and deletion are two distinct
//! operations; a scan on its own can never destroy data.

pub mod index;
pub mod results;
pub mod scanner;

pub use index::{FileReferenceIndex, ReferenceIndex};
pub use results::{DeleteReport, OrphanReport};
pub use scanner::{delete_orphans, find_orphans};
