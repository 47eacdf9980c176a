//! Error types for blob splitting.

use thiserror::Error;

/// Splitter construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// Piece capacity must be at least one byte
    #[error("invalid configuration: piece capacity must be greater than zero")]
    InvalidConfiguration,
}
