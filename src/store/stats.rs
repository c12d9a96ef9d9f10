// src/store/stats.rs
//! Statistics tracking for host stores.

use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) struct StoreStatsInner {
    pub(crate) bytes_in_use: AtomicUsize,
    pub(crate) minted: AtomicUsize,
    pub(crate) released: AtomicUsize,
    pub(crate) recycled: AtomicUsize,
}

impl StoreStatsInner {
    pub(crate) fn new() -> Self {
        Self {
            bytes_in_use: AtomicUsize::new(0),
            minted: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            recycled: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of a [`HostStore`](super::HostStore)'s bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of regions currently owned by a buffer
    pub live_handles: usize,
    /// Released handles waiting to be handed out again
    pub free_handles: usize,
    /// Total bytes held across all live regions
    pub bytes_in_use: usize,
    /// Handles created from the counter (never seen before)
    pub minted: usize,
    /// Regions released back to the store
    pub released: usize,
    /// Handles handed out again after a release
    pub recycled: usize,
}

impl StoreStats {
    /// Returns the share of region creations served by a recycled handle,
    /// as a percentage (0.0-100.0).
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::prelude::*;
    ///
    /// let store = HostStore::new(StoreConfig::default());
    /// for _ in 0..4 {
    ///     let _buf = IndirectBuffer::with_storage(HostStorage::allocate_in(&store, 8)?);
    /// }
    ///
    /// let stats = store.stats();
    /// assert_eq!(stats.minted, 1);
    /// assert_eq!(stats.recycle_rate(), 75.0);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn recycle_rate(&self) -> f64 {
        let created = self.minted + self.recycled;
        if created == 0 {
            return 0.0;
        }
        (self.recycled as f64 / created as f64) * 100.0
    }
}
