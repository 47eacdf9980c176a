//! Background eviction.
//!
//! Lazy eviction on the stitch path only buries groups a late piece happens
//! to land on. A sweeper thread calls [`Stitcher::sweep`] on a fixed
//! interval so that groups nobody touches again still get evicted and
//! reported.

use crate::stitcher::Stitcher;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to a running sweeper thread
///
/// The thread stops when the handle is dropped or [`stop`](Self::stop) is
/// called; both join the thread before returning.
pub struct SweeperHandle {
    stop_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

/// Spawn a thread that sweeps the stitcher every `interval`
///
/// With a fully unbounded [`StitcherConfig`](crate::StitcherConfig) every
/// sweep is a no-op; the thread is only worth running when an age or
/// pending-group bound is set.
pub fn spawn_sweeper(stitcher: Arc<Stitcher>, interval: Duration) -> SweeperHandle {
    let (stop_tx, stop_rx) = mpsc::channel();

    let thread = std::thread::Builder::new()
        .name("seam-sweeper".to_string())
        .spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let evicted = stitcher.sweep();
                        if evicted > 0 {
                            tracing::debug!("Sweeper evicted {} groups", evicted);
                        }
                    }
                }
            }
        })
        .expect("Failed to spawn sweeper thread");

    SweeperHandle {
        stop_tx,
        thread: Some(thread),
    }
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the thread to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
