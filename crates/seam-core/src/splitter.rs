//! Blob splitting.

use crate::DEFAULT_PIECE_CAPACITY;
use crate::error::SplitError;
use crate::piece::{GroupId, Piece};

/// Splits blobs into fixed-capacity pieces
///
/// Every call to [`split`](Splitter::split) mints a fresh [`GroupId`], so the
/// pieces of concurrent splits never collide in a downstream stitcher. The
/// splitter itself is stateless and freely shareable across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    capacity: usize,
}

impl Splitter {
    /// Create a splitter with the given piece payload capacity in bytes
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfiguration`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SplitError> {
        if capacity == 0 {
            return Err(SplitError::InvalidConfiguration);
        }
        Ok(Self { capacity })
    }

    /// Get the piece payload capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Calculate the number of pieces a blob of `blob_len` bytes splits into
    pub fn piece_count(&self, blob_len: usize) -> usize {
        blob_len.div_ceil(self.capacity)
    }

    /// Split a blob into pieces
    ///
    /// Produces `ceil(bytes.len() / capacity)` pieces sharing one fresh group
    /// ID. Every piece carries `capacity` payload bytes except the last,
    /// which holds the remainder. Empty input yields no pieces.
    pub fn split(&self, bytes: &[u8]) -> Vec<Piece> {
        let group_id = GroupId::random();
        let group_size = self.piece_count(bytes.len()) as u32;

        let pieces: Vec<Piece> = bytes
            .chunks(self.capacity)
            .enumerate()
            .map(|(index, chunk)| Piece::new(group_id, index as u32, group_size, chunk.to_vec()))
            .collect();

        tracing::debug!(
            "Split {} bytes into {} pieces for group {} (capacity {})",
            bytes.len(),
            pieces.len(),
            group_id,
            self.capacity
        );

        pieces
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PIECE_CAPACITY,
        }
    }
}
