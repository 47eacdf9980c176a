//! Stitcher configuration.

use std::time::Duration;

/// Reassembly cache configuration
///
/// Immutable once handed to a [`Stitcher`](crate::Stitcher). All bounds
/// default to `None`, which leaves the cache unbounded; embedders accepting
/// pieces from untrusted peers should set all three.
#[derive(Debug, Clone, Default)]
pub struct StitcherConfig {
    /// Maximum number of in-flight groups kept pending
    ///
    /// When a stitch call pushes the pending count over this bound, the
    /// oldest-created groups are evicted until the bound holds again.
    pub max_pending_groups: Option<usize>,

    /// Maximum age of an incomplete group before eviction
    ///
    /// Measured from the first accepted piece of the group; later pieces do
    /// not refresh it.
    pub max_group_age: Option<Duration>,

    /// Maximum reassembled blob size in bytes
    ///
    /// Enforced incrementally: a piece that would push a group's accumulated
    /// payload past this limit is rejected before it is stored.
    pub max_blob_size: Option<usize>,
}
