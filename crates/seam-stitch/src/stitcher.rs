//! Piece reassembly.
//!
//! The [`Stitcher`] accepts pieces of many interleaved groups, in any order,
//! from any thread, and returns each reassembled blob exactly once when its
//! last missing piece arrives.
//!
//! ## Stitch Flow
//!
//! ```text
//!   stitch(piece)
//!       │
//!       ├─ piece shape check ───────────── Err(InvalidPieceIndex)
//!       │
//!       ├─ per-group critical section
//!       │    ├─ bury expired group, reseed from the piece
//!       │    ├─ group size conflict ────── Err(InconsistentGroupDescriptor)
//!       │    ├─ duplicate index ────────── Ok(None), event
//!       │    ├─ size guard ─────────────── Err(SizeLimitExceeded)
//!       │    └─ store; if complete, remove and assemble
//!       │
//!       ├─ emit collected events (outside the critical section)
//!       └─ enforce the pending-group bound (oldest evicted first)
//! ```
//!
//! Mutations of one group are totally serialized by the cache's per-key
//! guard; pieces of different groups do not contend. No whole-cache lock is
//! ever taken on the stitch path.

use crate::config::StitcherConfig;
use crate::error::{Result, StitchError};
use crate::events::{EventSink, EvictionCause, StitchEvent, TracingSink};
use crate::group::PartialGroup;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use seam_core::{GroupId, Piece};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Snapshot of stitcher counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StitcherStats {
    /// Pieces handed to stitch calls, including rejected ones
    pub pieces_received: u64,

    /// Duplicate pieces discarded
    pub duplicates_discarded: u64,

    /// Groups fully reassembled and returned
    pub groups_restored: u64,

    /// Groups evicted for exceeding the maximum age
    pub groups_expired: u64,

    /// Groups evicted to honor the pending-group bound
    pub groups_evicted: u64,

    /// Total bytes returned by completed groups
    pub bytes_restored: u64,

    /// Groups currently pending
    pub groups_pending: u64,
}

/// Outcome of admitting the first piece of a group
enum Seeded {
    /// Single-piece group, whole blob already in hand
    Done(Vec<u8>),
    /// Multi-piece group waiting for the rest
    Pending(PartialGroup),
}

fn evicted_event(group_id: GroupId, cause: EvictionCause, group: &PartialGroup) -> StitchEvent {
    StitchEvent::GroupEvicted {
        group_id,
        cause,
        expected_count: group.expected_size(),
        received_count: group.received_count(),
    }
}

/// Reassembles blobs from pieces arriving in any order on any thread
///
/// Calls for the same group are serialized; different groups proceed in
/// parallel. Eviction of overdue or surplus groups happens inline on stitch
/// calls and through [`sweep`](Stitcher::sweep); it is reported through the
/// event sink, never to the caller that triggered it.
pub struct Stitcher {
    /// Immutable bounds
    config: StitcherConfig,

    /// In-flight groups (group_id -> collected pieces)
    groups: DashMap<GroupId, PartialGroup>,

    /// Receiver for eviction and duplicate events
    sink: Arc<dyn EventSink>,

    pieces_received: AtomicU64,
    duplicates_discarded: AtomicU64,
    groups_restored: AtomicU64,
    groups_expired: AtomicU64,
    groups_evicted: AtomicU64,
    bytes_restored: AtomicU64,
}

impl Stitcher {
    /// Create a stitcher that reports events through [`TracingSink`]
    pub fn new(config: StitcherConfig) -> Self {
        Self::with_event_sink(config, Arc::new(TracingSink))
    }

    /// Create a stitcher with an injected event sink
    pub fn with_event_sink(config: StitcherConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            groups: DashMap::new(),
            sink,
            pieces_received: AtomicU64::new(0),
            duplicates_discarded: AtomicU64::new(0),
            groups_restored: AtomicU64::new(0),
            groups_expired: AtomicU64::new(0),
            groups_evicted: AtomicU64::new(0),
            bytes_restored: AtomicU64::new(0),
        }
    }

    /// Add one piece, returning the reassembled blob if it completed its group
    ///
    /// Returns `Ok(None)` for every piece except the one that makes its group
    /// whole. Duplicates are discarded silently with a
    /// [`StitchEvent::DuplicateDiscarded`] event; they are never an error.
    ///
    /// # Errors
    ///
    /// - [`StitchError::InvalidPieceIndex`] if the piece's own shape is
    ///   contradictory (`group_size == 0` or `index >= group_size`)
    /// - [`StitchError::InconsistentGroupDescriptor`] if the piece disagrees
    ///   with the group size fixed by the group's first piece
    /// - [`StitchError::SizeLimitExceeded`] if storing the payload would pass
    ///   the configured blob size; the group is left untouched
    pub fn stitch(&self, piece: Piece) -> Result<Option<Vec<u8>>> {
        self.pieces_received.fetch_add(1, Ordering::Relaxed);

        if piece.group_size() == 0 || piece.index() >= piece.group_size() {
            tracing::warn!(
                "Rejected piece with index {} claiming {} pieces for group {}",
                piece.index(),
                piece.group_size(),
                piece.group_id()
            );
            return Err(StitchError::InvalidPieceIndex {
                group_id: piece.group_id(),
                index: piece.index(),
                group_size: piece.group_size(),
            });
        }

        tracing::trace!(
            "Received piece {}/{} for group {} ({} bytes)",
            piece.index() + 1,
            piece.group_size(),
            piece.group_id(),
            piece.payload_len()
        );

        let mut events = Vec::new();
        let result = self.stitch_locked(piece, &mut events);

        for event in events {
            self.record(&event);
            self.sink.emit(event);
        }

        if let Ok(Some(blob)) = &result {
            self.groups_restored.fetch_add(1, Ordering::Relaxed);
            self.bytes_restored
                .fetch_add(blob.len() as u64, Ordering::Relaxed);
        }

        self.enforce_capacity();

        result
    }

    /// Run both eviction passes, returning the number of groups evicted
    ///
    /// Overdue groups are also buried lazily when a stitch call lands on
    /// them; sweeping catches the ones no piece touches again. Callers can
    /// invoke this directly or leave it to a
    /// [`spawn_sweeper`](crate::spawn_sweeper) thread.
    pub fn sweep(&self) -> usize {
        self.evict_expired() + self.enforce_capacity()
    }

    /// Get the number of groups currently pending
    pub fn pending_groups(&self) -> usize {
        self.groups.len()
    }

    /// Check whether a group has pieces waiting
    pub fn is_pending(&self, group_id: &GroupId) -> bool {
        self.groups.contains_key(group_id)
    }

    /// Get the configured bounds
    pub fn config(&self) -> &StitcherConfig {
        &self.config
    }

    /// Get a snapshot of the stitcher counters
    pub fn stats(&self) -> StitcherStats {
        StitcherStats {
            pieces_received: self.pieces_received.load(Ordering::Relaxed),
            duplicates_discarded: self.duplicates_discarded.load(Ordering::Relaxed),
            groups_restored: self.groups_restored.load(Ordering::Relaxed),
            groups_expired: self.groups_expired.load(Ordering::Relaxed),
            groups_evicted: self.groups_evicted.load(Ordering::Relaxed),
            bytes_restored: self.bytes_restored.load(Ordering::Relaxed),
            groups_pending: self.groups.len() as u64,
        }
    }

    /// Apply every group-local step under the piece's entry guard
    ///
    /// Eviction events are collected into `events` and emitted by the caller
    /// after the guard is gone; nothing here may touch the whole cache.
    fn stitch_locked(&self, piece: Piece, events: &mut Vec<StitchEvent>) -> Result<Option<Vec<u8>>> {
        let group_id = piece.group_id();

        match self.groups.entry(group_id) {
            Entry::Occupied(mut occupied) => {
                if let Some(max_age) = self.config.max_group_age {
                    if occupied.get().is_expired(max_age, Instant::now()) {
                        // The piece cannot resurrect the dead group; it is
                        // buried in place and the piece seeds a fresh one.
                        return match self.seed(piece) {
                            Ok(Seeded::Pending(fresh)) => {
                                let dead = occupied.insert(fresh);
                                events.push(evicted_event(
                                    group_id,
                                    EvictionCause::Expired,
                                    &dead,
                                ));
                                Ok(None)
                            }
                            Ok(Seeded::Done(blob)) => {
                                let (_, dead) = occupied.remove_entry();
                                events.push(evicted_event(
                                    group_id,
                                    EvictionCause::Expired,
                                    &dead,
                                ));
                                tracing::debug!(
                                    "Stitched 1 piece into {} bytes for group {}",
                                    blob.len(),
                                    group_id
                                );
                                Ok(Some(blob))
                            }
                            Err(err) => {
                                let (_, dead) = occupied.remove_entry();
                                events.push(evicted_event(
                                    group_id,
                                    EvictionCause::Expired,
                                    &dead,
                                ));
                                Err(err)
                            }
                        };
                    }
                }

                let group = occupied.get_mut();

                if group.expected_size() != piece.group_size() {
                    tracing::warn!(
                        "Rejected piece claiming {} pieces for group {} fixed at {}",
                        piece.group_size(),
                        group_id,
                        group.expected_size()
                    );
                    return Err(StitchError::InconsistentGroupDescriptor {
                        group_id,
                        expected: group.expected_size(),
                        claimed: piece.group_size(),
                    });
                }

                if group.contains(piece.index()) {
                    events.push(StitchEvent::DuplicateDiscarded {
                        group_id,
                        index: piece.index(),
                    });
                    return Ok(None);
                }

                if let Some(limit) = self.config.max_blob_size {
                    if group.accumulated_bytes() + piece.payload_len() > limit {
                        tracing::warn!(
                            "Rejected {} byte piece for group {} at {} of {} byte limit",
                            piece.payload_len(),
                            group_id,
                            group.accumulated_bytes(),
                            limit
                        );
                        return Err(StitchError::SizeLimitExceeded {
                            group_id,
                            accumulated: group.accumulated_bytes(),
                            incoming: piece.payload_len(),
                            limit,
                        });
                    }
                }

                group.insert(piece.index(), piece.into_payload());

                if group.is_complete() {
                    let (_, done) = occupied.remove_entry();
                    tracing::debug!(
                        "Stitched {} pieces into {} bytes for group {}",
                        done.received_count(),
                        done.accumulated_bytes(),
                        group_id
                    );
                    return Ok(Some(done.assemble()));
                }

                Ok(None)
            }
            Entry::Vacant(vacant) => match self.seed(piece)? {
                Seeded::Done(blob) => {
                    tracing::debug!(
                        "Stitched 1 piece into {} bytes for group {}",
                        blob.len(),
                        group_id
                    );
                    Ok(Some(blob))
                }
                Seeded::Pending(group) => {
                    vacant.insert(group);
                    Ok(None)
                }
            },
        }
    }

    /// Admit the first piece of a group
    ///
    /// A single-piece group completes right here and never occupies the
    /// cache. Size-guard failures reject the piece before any group exists.
    fn seed(&self, piece: Piece) -> Result<Seeded> {
        if let Some(limit) = self.config.max_blob_size {
            if piece.payload_len() > limit {
                tracing::warn!(
                    "Rejected {} byte first piece for group {} over {} byte limit",
                    piece.payload_len(),
                    piece.group_id(),
                    limit
                );
                return Err(StitchError::SizeLimitExceeded {
                    group_id: piece.group_id(),
                    accumulated: 0,
                    incoming: piece.payload_len(),
                    limit,
                });
            }
        }

        if piece.group_size() == 1 {
            return Ok(Seeded::Done(piece.into_payload()));
        }

        let mut group = PartialGroup::new(piece.group_size());
        group.insert(piece.index(), piece.into_payload());
        Ok(Seeded::Pending(group))
    }

    /// Evict groups older than the configured maximum age
    fn evict_expired(&self) -> usize {
        let max_age = match self.config.max_group_age {
            Some(max_age) => max_age,
            None => return 0,
        };

        let now = Instant::now();
        let stale: Vec<GroupId> = self
            .groups
            .iter()
            .filter(|entry| entry.value().is_expired(max_age, now))
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for group_id in stale {
            // Re-check under the removal guard; the slot may hold a fresh
            // group by now.
            let removed = self
                .groups
                .remove_if(&group_id, |_, group| group.is_expired(max_age, now));

            if let Some((_, dead)) = removed {
                let event = evicted_event(group_id, EvictionCause::Expired, &dead);
                self.record(&event);
                self.sink.emit(event);
                evicted += 1;
            }
        }

        evicted
    }

    /// Evict oldest-created groups until the pending bound holds
    fn enforce_capacity(&self) -> usize {
        let bound = match self.config.max_pending_groups {
            Some(bound) => bound,
            None => return 0,
        };

        let over = self.groups.len().saturating_sub(bound);
        if over == 0 {
            return 0;
        }

        // Snapshot ages without holding any entry guard.
        let mut pending: Vec<(GroupId, Instant)> = self
            .groups
            .iter()
            .map(|entry| (*entry.key(), entry.value().created_at()))
            .collect();
        pending.sort_by_key(|&(_, created_at)| created_at);

        let mut evicted = 0;
        for (group_id, created_at) in pending.into_iter().take(over) {
            // Remove only the group observed in the snapshot; a fresh group
            // reusing the ID keeps its seat.
            let removed = self
                .groups
                .remove_if(&group_id, |_, group| group.created_at() == created_at);

            if let Some((_, dead)) = removed {
                let event = evicted_event(group_id, EvictionCause::Capacity, &dead);
                self.record(&event);
                self.sink.emit(event);
                evicted += 1;
            }
        }

        evicted
    }

    fn record(&self, event: &StitchEvent) {
        match event {
            StitchEvent::GroupEvicted {
                cause: EvictionCause::Expired,
                ..
            } => {
                self.groups_expired.fetch_add(1, Ordering::Relaxed);
            }
            StitchEvent::GroupEvicted {
                cause: EvictionCause::Capacity,
                ..
            } => {
                self.groups_evicted.fetch_add(1, Ordering::Relaxed);
            }
            StitchEvent::DuplicateDiscarded { .. } => {
                self.duplicates_discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl Default for Stitcher {
    fn default() -> Self {
        Self::new(StitcherConfig::default())
    }
}
