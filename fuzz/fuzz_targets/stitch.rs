//! Fuzz target for the stitcher
//!
//! Feeds arbitrary piece streams into a bounded stitcher and checks that the
//! documented outcomes hold: no panic, rejected pieces leave no group behind,
//! and the pending-group bound is honored after every call.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seam_core::{GroupId, Piece};
use seam_stitch::{StitchError, Stitcher, StitcherConfig};

#[derive(Debug, Arbitrary)]
struct PieceInput {
    /// Collapsed into 8 group IDs so pieces actually collide
    group: u8,
    index: u32,
    group_size: u32,
    payload: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct StitchInput {
    max_pending_groups: Option<u8>,
    max_blob_size: Option<u16>,
    pieces: Vec<PieceInput>,
}

fuzz_target!(|input: StitchInput| {
    let config = StitcherConfig {
        max_pending_groups: input.max_pending_groups.map(usize::from),
        max_group_age: None,
        max_blob_size: input.max_blob_size.map(usize::from),
    };
    let stitcher = Stitcher::new(config);

    for piece in input.pieces {
        let group_id = GroupId::from_bytes([piece.group % 8; 16]);
        let invalid_shape = piece.group_size == 0 || piece.index >= piece.group_size;

        let result = stitcher.stitch(Piece::new(
            group_id,
            piece.index,
            piece.group_size,
            piece.payload,
        ));

        match result {
            Ok(Some(blob)) => {
                // A completed group never stays pending.
                assert!(!stitcher.is_pending(&group_id));
                if let Some(limit) = stitcher.config().max_blob_size {
                    assert!(blob.len() <= limit);
                }
            }
            Ok(None) => {}
            Err(StitchError::InvalidPieceIndex { .. }) => {
                assert!(invalid_shape);
            }
            Err(_) => {}
        }

        if let Some(bound) = stitcher.config().max_pending_groups {
            assert!(stitcher.pending_groups() <= bound);
        }
    }
});
