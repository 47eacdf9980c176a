//! Piece data model.
//!
//! A [`Piece`] is the unit a transport moves between nodes: one bounded
//! fragment of a blob, tagged with the identity of its group, its position
//! within the group, and the total piece count of the group. Pieces are
//! immutable once constructed.

use crate::GROUP_ID_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier shared by every piece of one split blob
///
/// A fresh ID is minted per split, so two splits of identical bytes
/// produce distinguishable groups.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId([u8; GROUP_ID_SIZE]);

impl GroupId {
    /// Mint a random group ID from the OS CSPRNG
    pub fn random() -> Self {
        let mut bytes = [0u8; GROUP_ID_SIZE];
        getrandom::getrandom(&mut bytes).expect("Failed to generate group ID");
        Self(bytes)
    }

    /// Create a group ID from raw bytes
    pub fn from_bytes(bytes: [u8; GROUP_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw ID bytes
    pub fn as_bytes(&self) -> &[u8; GROUP_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", hex::encode(self.0))
    }
}

/// One bounded fragment of a blob
///
/// Pieces of a group share `group_id` and `group_size`; `index` places the
/// payload within the reassembled blob. Two pieces with equal
/// `(group_id, index)` are duplicates of each other regardless of payload.
///
/// The serde representation carries all four fields losslessly; the concrete
/// wire encoding is the transport's choice.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    group_id: GroupId,
    index: u32,
    group_size: u32,
    payload: Vec<u8>,
}

impl Piece {
    /// Create a piece from its parts
    ///
    /// Intended for transports rebuilding pieces they decoded by hand;
    /// pieces produced by a [`Splitter`](crate::Splitter) are already
    /// well-formed.
    pub fn new(group_id: GroupId, index: u32, group_size: u32, payload: Vec<u8>) -> Self {
        Self {
            group_id,
            index,
            group_size,
            payload,
        }
    }

    /// Get the group ID
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Get the position of this piece within its group (0-based)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the total piece count of the group
    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    /// Get the payload slice
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Consume the piece and take its payload
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl fmt::Debug for Piece {
    // Payload bytes stay out of Debug output; only the length is rendered.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Piece")
            .field("group_id", &self.group_id)
            .field("index", &self.index)
            .field("group_size", &self.group_size)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_piece() -> Piece {
        Piece::new(GroupId::from_bytes([7u8; GROUP_ID_SIZE]), 2, 5, vec![1, 2, 3])
    }

    #[test]
    fn test_group_id_random_unique() {
        let id1 = GroupId::random();
        let id2 = GroupId::random();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_group_id_bytes_roundtrip() {
        let bytes = [0xAB; GROUP_ID_SIZE];
        let id = GroupId::from_bytes(bytes);
        assert_eq!(id.as_bytes(), &bytes);
    }

    #[test]
    fn test_group_id_display_hex() {
        let id = GroupId::from_bytes([0x0F; GROUP_ID_SIZE]);
        assert_eq!(id.to_string(), "0f".repeat(GROUP_ID_SIZE));
    }

    #[test]
    fn test_piece_accessors() {
        let piece = create_test_piece();
        assert_eq!(piece.group_id(), GroupId::from_bytes([7u8; GROUP_ID_SIZE]));
        assert_eq!(piece.index(), 2);
        assert_eq!(piece.group_size(), 5);
        assert_eq!(piece.payload(), &[1, 2, 3]);
        assert_eq!(piece.payload_len(), 3);
    }

    #[test]
    fn test_piece_into_payload() {
        let piece = create_test_piece();
        assert_eq!(piece.into_payload(), vec![1, 2, 3]);
    }

    #[test]
    fn test_piece_debug_hides_payload() {
        let piece = create_test_piece();
        let rendered = format!("{piece:?}");
        assert!(rendered.contains("payload_len"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }

    #[test]
    fn test_piece_bincode_roundtrip() {
        let piece = create_test_piece();
        let encoded = bincode::serialize(&piece).unwrap();
        let decoded: Piece = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, piece);
    }

    #[test]
    fn test_piece_json_roundtrip() {
        let piece = create_test_piece();
        let encoded = serde_json::to_string(&piece).unwrap();
        let decoded: Piece = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, piece);
    }
}
