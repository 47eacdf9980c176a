//! Error types for stitching.

use seam_core::GroupId;
use thiserror::Error;

/// Errors surfaced synchronously by [`Stitcher::stitch`](crate::Stitcher::stitch)
///
/// Evictions are never errors; they reach the embedder only through the
/// event sink, decoupled from any particular call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// Piece claims a shape no valid group can have
    #[error("invalid piece index {index} for group {group_id} claiming {group_size} pieces")]
    InvalidPieceIndex {
        /// Group the piece claims to belong to
        group_id: GroupId,
        /// Claimed position within the group
        index: u32,
        /// Claimed total piece count
        group_size: u32,
    },

    /// Piece contradicts the group size fixed by the first piece of its group
    #[error("group {group_id} expects {expected} pieces, got a piece claiming {claimed}")]
    InconsistentGroupDescriptor {
        /// Group the piece belongs to
        group_id: GroupId,
        /// Group size fixed by the first accepted piece
        expected: u32,
        /// Conflicting size claimed by the rejected piece
        claimed: u32,
    },

    /// Accepting the piece would push the group past the configured blob size
    #[error("group {group_id} at {accumulated} bytes cannot accept {incoming} more (limit {limit})")]
    SizeLimitExceeded {
        /// Group the piece belongs to
        group_id: GroupId,
        /// Bytes already accumulated for the group
        accumulated: usize,
        /// Payload length of the rejected piece
        incoming: usize,
        /// Configured maximum blob size
        limit: usize,
    },
}

/// Result type for stitch operations
pub type Result<T> = std::result::Result<T, StitchError>;
