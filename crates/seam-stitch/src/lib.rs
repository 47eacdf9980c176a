//! # Seam Stitch
//!
//! Reassembly engine for pieces produced by `seam-core`: a concurrency-safe
//! cache of in-flight groups that detects completion, reconstructs the
//! original bytes in order, and bounds its own memory.
//!
//! This crate provides:
//! - [`Stitcher`] with its piece-at-a-time [`stitch`](Stitcher::stitch) operation
//! - [`StitcherConfig`] bounds for pending groups, group age, and blob size
//! - [`EventSink`] observability for evictions and duplicate discards
//! - [`spawn_sweeper`] background expiry sweeping on a plain thread
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Stitcher                          │
//! │   stitch(piece) -> Result<Option<Vec<u8>>, StitchError>   │
//! ├───────────────────────────────────────────────────────────┤
//! │               group cache (one slot per group)            │
//! │     mutations serialized per group, groups independent    │
//! ├───────────────────────────────────────────────────────────┤
//! │   age + pending bounds evict       size bound rejects     │
//! │   (EventSink, never thrown)        (synchronous error)    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Stitch calls complete synchronously; there is no async runtime anywhere
//! in the crate. Callers on plain threads feed pieces in whatever order the
//! transport delivers them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod events;
mod group;
pub mod stitcher;
pub mod sweeper;

pub use config::StitcherConfig;
pub use error::StitchError;
pub use events::{EventSink, EvictionCause, StitchEvent, TracingSink};
pub use stitcher::{Stitcher, StitcherStats};
pub use sweeper::{SweeperHandle, spawn_sweeper};
