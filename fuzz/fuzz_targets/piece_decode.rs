//! Fuzz target for piece decoding
//!
//! Tests that deserializing arbitrary bytes never panics and that every
//! piece that decodes re-encodes to an equivalent value.

#![no_main]

use bincode::Options;
use libfuzzer_sys::fuzz_target;
use seam_core::Piece;

fuzz_target!(|data: &[u8]| {
    // Cap the decoded size so a forged length prefix cannot force a huge
    // allocation.
    let codec = bincode::options()
        .with_limit(1 << 20)
        .allow_trailing_bytes();

    if let Ok(piece) = codec.deserialize::<Piece>(data) {
        let encoded = codec.serialize(&piece).expect("re-encoding failed");
        let decoded: Piece = codec.deserialize(&encoded).expect("re-decoding failed");
        assert_eq!(decoded, piece);
    }
});
