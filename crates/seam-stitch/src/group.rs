//! In-flight group state.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Pieces collected so far for one group
///
/// Lives inside the stitcher's cache and is only ever touched under that
/// cache's per-key guard. The expected size is fixed at creation by the
/// first piece and never changes; stored indices are unique and all below
/// the expected size.
#[derive(Debug)]
pub(crate) struct PartialGroup {
    /// Total piece count fixed by the first accepted piece
    expected_size: u32,

    /// Received payloads keyed by piece index
    received: BTreeMap<u32, Vec<u8>>,

    /// Sum of stored payload lengths
    accumulated_bytes: usize,

    /// Time the group was created, for age-based eviction
    created_at: Instant,
}

impl PartialGroup {
    /// Create an empty group expecting `expected_size` pieces
    pub(crate) fn new(expected_size: u32) -> Self {
        Self {
            expected_size,
            received: BTreeMap::new(),
            accumulated_bytes: 0,
            created_at: Instant::now(),
        }
    }

    pub(crate) fn expected_size(&self) -> u32 {
        self.expected_size
    }

    pub(crate) fn received_count(&self) -> u32 {
        self.received.len() as u32
    }

    pub(crate) fn accumulated_bytes(&self) -> usize {
        self.accumulated_bytes
    }

    pub(crate) fn created_at(&self) -> Instant {
        self.created_at
    }

    pub(crate) fn contains(&self, index: u32) -> bool {
        self.received.contains_key(&index)
    }

    /// Store a payload at `index`
    ///
    /// The caller has already ruled out duplicates and indices outside
    /// `0..expected_size`.
    pub(crate) fn insert(&mut self, index: u32, payload: Vec<u8>) {
        self.accumulated_bytes += payload.len();
        self.received.insert(index, payload);
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.received.len() as u32 == self.expected_size
    }

    pub(crate) fn is_expired(&self, max_age: Duration, now: Instant) -> bool {
        now.duration_since(self.created_at) >= max_age
    }

    /// Concatenate payloads by ascending index into the original blob
    pub(crate) fn assemble(self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(self.accumulated_bytes);
        for payload in self.received.into_values() {
            blob.extend_from_slice(&payload);
        }
        blob
    }
}
