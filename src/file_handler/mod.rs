//! File handler module for awsm-md
//!
//! Handles all file system operations including:
//! - Reading documents with encoding detection and size limits
//! - Atomic save operations for data safety

pub mod io;

pub use io::*;
