//! Shared helpers for the seam integration suite.
//!
//! Blob builders, piece shuffling, and an event sink that records into a
//! vector the tests can inspect afterwards.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use seam_stitch::{EventSink, StitchEvent};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sample text long enough to split into a handful of pieces.
pub const FIRST_PARAGRAPH: &str = "There are three hundred and sixty-four days \
    when you might get un-birthday presents, and only one for birthday presents, \
    you know. When I use a word, it means just what I choose it to mean, neither \
    more nor less.";

/// A second sample text, distinct from the first.
pub const SECOND_PARAGRAPH: &str = "The question is, whether you can make words \
    mean so many different things. The question is, which is to be master, that \
    is all. Impenetrability! That is what I say.";

/// Build a deterministic blob with non-repeating byte patterns.
pub fn patterned_blob(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Shuffle items with a seeded generator so failures reproduce.
pub fn shuffled<T>(mut items: Vec<T>, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
    items
}

/// Event sink that appends every event to a shared vector.
pub fn recording_sink() -> (Arc<dyn EventSink>, Arc<Mutex<Vec<StitchEvent>>>) {
    let events: Arc<Mutex<Vec<StitchEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_events = Arc::clone(&events);
    let sink: Arc<dyn EventSink> =
        Arc::new(move |event: StitchEvent| sink_events.lock().unwrap().push(event));
    (sink, events)
}

/// Poll `condition` every few milliseconds until it holds or `deadline` passes.
///
/// Returns whether the condition was observed. Keeps timing-sensitive tests
/// from depending on a single sleep estimate.
pub fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let give_up = Instant::now() + deadline;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= give_up {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterned_blob_deterministic() {
        assert_eq!(patterned_blob(8), patterned_blob(8));
        assert_eq!(patterned_blob(3), vec![0, 1, 2]);
    }

    #[test]
    fn test_shuffled_reproducible() {
        let items: Vec<u32> = (0..64).collect();
        assert_eq!(shuffled(items.clone(), 7), shuffled(items.clone(), 7));
        assert_ne!(shuffled(items.clone(), 7), items);
    }

    #[test]
    fn test_wait_until_observes_condition() {
        assert!(wait_until(Duration::from_millis(100), || true));
        assert!(!wait_until(Duration::from_millis(20), || false));
    }
}
