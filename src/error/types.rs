//! Error types
//!
//! Defines domain-specific error types for each module of the media store.
//! Routine outcomes (a source file that cannot be located, a validation
//! failure) are modelled as return values elsewhere; the enums here cover
//! genuine failures the caller must handle.

use std::fmt;
use std::io;

/// Store module errors
#[derive(Debug)]
pub enum StoreError {
    InvalidSubfolder(String),
    InvalidPath(String),
    FileAlreadyExists(String),
    NamespaceExhausted(String),
    IoError(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidSubfolder(s) => write!(f, "Subfolder not permitted: {}", s),
            StoreError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StoreError::FileAlreadyExists(p) => write!(f, "File already exists: {}", p),
            StoreError::NamespaceExhausted(p) => {
                write!(f, "No free duplicate suffix left for: {}", p)
            }
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::IoError(error)
    }
}

impl From<walkdir::Error> for StoreError {
    fn from(error: walkdir::Error) -> Self {
        StoreError::IoError(
            error
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem walk failed")),
        )
    }
}

/// Errors raised by the persistence collaborator when queried for
/// referenced paths
#[derive(Debug)]
pub enum IndexError {
    Unavailable(String),
    Corrupt(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::Unavailable(s) => write!(f, "Reference index unavailable: {}", s),
            IndexError::Corrupt(s) => write!(f, "Reference index corrupt: {}", s),
        }
    }
}

impl std::error::Error for IndexError {}

/// Orphan scan module errors
#[derive(Debug)]
pub enum ScanError {
    InvalidSubfolder(String),
    Index(IndexError),
    IoError(io::Error),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::InvalidSubfolder(s) => write!(f, "Subfolder not permitted: {}", s),
            ScanError::Index(e) => write!(f, "Reference index error: {}", e),
            ScanError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<IndexError> for ScanError {
    fn from(error: IndexError) -> Self {
        ScanError::Index(error)
    }
}

impl From<io::Error> for ScanError {
    fn from(error: io::Error) -> Self {
        ScanError::IoError(error)
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(error: walkdir::Error) -> Self {
        ScanError::IoError(
            error
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem walk failed")),
        )
    }
}

/// General media store error that encompasses all error types
#[derive(Debug)]
pub enum MediaStoreError {
    Store(StoreError),
    Scan(ScanError),
    Index(IndexError),
    Config(config::ConfigError),
    InvalidMode(String),
    IoError(io::Error),
}

impl fmt::Display for MediaStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaStoreError::Store(e) => write!(f, "Store error: {}", e),
            MediaStoreError::Scan(e) => write!(f, "Scan error: {}", e),
            MediaStoreError::Index(e) => write!(f, "Index error: {}", e),
            MediaStoreError::Config(e) => write!(f, "Configuration error: {}", e),
            MediaStoreError::InvalidMode(s) => write!(f, "Invalid permission mode: {}", s),
            MediaStoreError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MediaStoreError {}

// Implement conversions from specific errors to MediaStoreError
impl From<StoreError> for MediaStoreError {
    fn from(error: StoreError) -> Self {
        MediaStoreError::Store(error)
    }
}

impl From<ScanError> for MediaStoreError {
    fn from(error: ScanError) -> Self {
        MediaStoreError::Scan(error)
    }
}

impl From<IndexError> for MediaStoreError {
    fn from(error: IndexError) -> Self {
        MediaStoreError::Index(error)
    }
}

impl From<config::ConfigError> for MediaStoreError {
    fn from(error: config::ConfigError) -> Self {
        MediaStoreError::Config(error)
    }
}

impl From<io::Error> for MediaStoreError {
    fn from(error: io::Error) -> Self {
        MediaStoreError::IoError(error)
    }
}
