//! Stitching event stream.
//!
//! Evictions and duplicate discards never surface as errors on the stitch
//! path; they are delivered to an [`EventSink`] injected at construction.
//! The default [`TracingSink`] turns them into log records.

use seam_core::GroupId;

/// Why an incomplete group was removed from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionCause {
    /// Group exceeded the configured maximum age
    Expired,
    /// Group was the oldest when the pending-group bound was exceeded
    Capacity,
}

/// Observable stitching events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchEvent {
    /// An incomplete group was removed and its pieces discarded
    ///
    /// The group is gone for good; pieces arriving for it later seed a brand
    /// new group under the same ID.
    GroupEvicted {
        /// Evicted group
        group_id: GroupId,
        /// Why the group was removed
        cause: EvictionCause,
        /// Piece count the group was waiting for
        expected_count: u32,
        /// Pieces actually received before eviction
        received_count: u32,
    },

    /// A piece with an already-stored `(group_id, index)` was discarded
    DuplicateDiscarded {
        /// Group the duplicate belongs to
        group_id: GroupId,
        /// Duplicated piece index
        index: u32,
    },
}

/// Receiver for stitching events
///
/// Implementations must be cheap and non-blocking; events are emitted on the
/// stitch path after the per-group critical section ends.
pub trait EventSink: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: StitchEvent);
}

impl<F> EventSink for F
where
    F: Fn(StitchEvent) + Send + Sync,
{
    fn emit(&self, event: StitchEvent) {
        self(event)
    }
}

/// Default sink that logs events through `tracing`
///
/// Evictions log at `warn`, duplicate discards at `debug`.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: StitchEvent) {
        match event {
            StitchEvent::GroupEvicted {
                group_id,
                cause,
                expected_count,
                received_count,
            } => {
                tracing::warn!(
                    "Group {} evicted ({:?}): expecting {} pieces but only received {}",
                    group_id,
                    cause,
                    expected_count,
                    received_count
                );
            }
            StitchEvent::DuplicateDiscarded { group_id, index } => {
                tracing::debug!("Discarded duplicate piece {} for group {}", index, group_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_core::GROUP_ID_SIZE;
    use std::sync::{Arc, Mutex};

    fn create_test_event() -> StitchEvent {
        StitchEvent::GroupEvicted {
            group_id: GroupId::from_bytes([1u8; GROUP_ID_SIZE]),
            cause: EvictionCause::Expired,
            expected_count: 10,
            received_count: 4,
        }
    }

    #[test]
    fn test_closure_sink() {
        let seen: Arc<Mutex<Vec<StitchEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink: Arc<dyn EventSink> =
            Arc::new(move |event: StitchEvent| seen_clone.lock().unwrap().push(event));

        sink.emit(create_test_event());

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], create_test_event());
    }

    #[test]
    fn test_tracing_sink_accepts_all_events() {
        let sink = TracingSink;
        sink.emit(create_test_event());
        sink.emit(StitchEvent::DuplicateDiscarded {
            group_id: GroupId::from_bytes([2u8; GROUP_ID_SIZE]),
            index: 3,
        });
    }
}
