//! Error handling
//!
//! Defines error types for the media store modules.

pub mod types;

pub use types::*;
