//! Fuzz target for the splitter
//!
//! Tests that splitting arbitrary blobs at arbitrary capacities upholds the
//! piece shape guarantees.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seam_core::Splitter;

#[derive(Debug, Arbitrary)]
struct SplitInput {
    capacity: u16,
    blob: Vec<u8>,
}

fuzz_target!(|input: SplitInput| {
    let splitter = match Splitter::new(input.capacity as usize) {
        Ok(splitter) => splitter,
        Err(_) => {
            assert_eq!(input.capacity, 0);
            return;
        }
    };

    let pieces = splitter.split(&input.blob);
    assert_eq!(pieces.len(), splitter.piece_count(input.blob.len()));

    let mut rebuilt = Vec::with_capacity(input.blob.len());
    for (i, piece) in pieces.iter().enumerate() {
        assert_eq!(piece.index() as usize, i);
        assert_eq!(piece.group_size() as usize, pieces.len());
        assert_eq!(piece.group_id(), pieces[0].group_id());
        assert!(piece.payload_len() <= input.capacity as usize);
        rebuilt.extend_from_slice(piece.payload());
    }
    assert_eq!(rebuilt, input.blob);
});
