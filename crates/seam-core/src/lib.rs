//! # Seam Core
//!
//! Piece data model and blob splitter for the seam reassembly engine.
//!
//! This crate provides:
//! - The [`Piece`] wire type carrying group identity, position, and payload
//! - [`GroupId`] minting and rendering
//! - [`Splitter`] for dividing blobs into bounded, transport-friendly pieces
//!
//! Reassembly of pieces back into blobs lives in the `seam-stitch` crate.
//!
//! ## Data Flow
//!
//! ```text
//! Sender                                Receiver
//!     |                                     |
//!     |  split(blob) -> [p0, p1, .. pN]     |
//!     |                                     |
//!     |-- p0 ------------------------------>|
//!     |-- p1 ------------------------------>|  stitch(p) -> None
//!     |-- ...        (any order)            |  stitch(p) -> None
//!     |-- pN ------------------------------>|  stitch(p) -> Some(blob)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod piece;
pub mod splitter;

pub use error::SplitError;
pub use piece::{GroupId, Piece};
pub use splitter::Splitter;

/// Default piece payload capacity (64 KiB)
pub const DEFAULT_PIECE_CAPACITY: usize = 64 * 1024;

/// Group ID size in bytes
pub const GROUP_ID_SIZE: usize = 16;
