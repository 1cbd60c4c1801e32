//! Error types for YAML parsing.

use thiserror::Error;

/// Result type alias for manifest-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the node tree.
#[derive(Debug, Error)]
pub enum Error {
    /// The scanner rejected the input before a tree could be built.
    #[error("invalid YAML syntax: {0}")]
    Scan(#[from] yaml_rust2::ScanError),
}
