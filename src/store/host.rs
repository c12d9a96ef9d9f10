// src/store/host.rs
//! Handle-keyed region table standing in for memory held by an embedding host.
//!
//! # Architecture
//!
//! Every region lives in a [`DashMap`] keyed by a non-zero [`Handle`]. A buffer
//! never holds a reference into the table; it keeps the handle and asks the
//! store to read, write, resize or copy on its behalf, the same way a buffer
//! in a browser build would call out to script code keyed by an integer.
//!
//! Handles are minted from an atomic counter. Released handles go to a
//! lock-free free list and are only handed out again after their region has
//! been removed, so a handle names at most one live region at a time.
//!
//! # Memory Safety
//!
//! Region bytes are wiped with [`zeroize`] when a region is released and when
//! a shrink discards its tail, so a later region (or a regrown one) never
//! observes stale content.

use super::config::StoreConfig;
use super::stats::{StoreStats, StoreStatsInner};
use crate::backend::{Handle, resize_zeroed};
use crate::error::{BufferError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use zeroize::Zeroize;

/// Chunk size used when staging copies between two different regions.
const COPY_CHUNK: usize = 64 * 1024;

static GLOBAL_STORE: LazyLock<Arc<HostStore>> =
    LazyLock::new(|| HostStore::new(StoreConfig::default()));

// ---------------------------------------------------------------------------
// Free handle list with approximate size tracking
// ---------------------------------------------------------------------------

/// Wrapper around `crossbeam::SegQueue` that tracks an approximate length.
///
/// The counter and the queue are not updated atomically, so `len()` may be
/// briefly stale. It is only used for statistics.
struct HandleQueue {
    items: crossbeam::queue::SegQueue<Handle>,
    size: AtomicUsize,
}

impl HandleQueue {
    fn new() -> Self {
        Self {
            items: crossbeam::queue::SegQueue::new(),
            size: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn push(&self, handle: Handle) {
        self.items.push(handle);
        self.size.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn pop(&self) -> Option<Handle> {
        self.items.pop().inspect(|_| {
            self.size.fetch_sub(1, Ordering::Relaxed);
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }
}

#[cold]
#[track_caller]
fn unknown_handle(handle: Handle) -> ! {
    panic!("handle {} does not name a live region", handle)
}

// ---------------------------------------------------------------------------
// HostStore
// ---------------------------------------------------------------------------

/// Shared store of byte regions addressed by opaque handles.
///
/// Regions are created, resized, written and released only through the
/// [`HostStorage`](crate::HostStorage) that owns them, so every live handle
/// has exactly one owner and its length always matches that owner's size.
/// Embedding glue gets read-only lookups: [`region_len`](Self::region_len)
/// and [`with_region`](Self::with_region), both of which return `None` for a
/// handle that is not live.
///
/// # Example
///
/// ```rust
/// use indirectbuf::prelude::*;
///
/// let store = HostStore::new(StoreConfig::default());
/// let mut buf = HostBuffer::with_storage(HostStorage::allocate_in(&store, 4)?);
/// buf.set_range(0, b"abcd");
/// buf.move_range(1, 0, 3);
///
/// let handle = buf.handle().unwrap();
/// assert_eq!(store.with_region(handle, |bytes| bytes.to_vec()), Some(b"aabc".to_vec()));
///
/// drop(buf);
/// assert_eq!(store.region_len(handle), None);
/// # Ok::<(), BufferError>(())
/// ```
///
/// Releasing or resizing a region behind its buffer's back does not compile:
///
/// ```compile_fail
/// use indirectbuf::prelude::*;
///
/// let store = HostStore::new(StoreConfig::default());
/// let buf = HostBuffer::with_storage(HostStorage::allocate_in(&store, 4).unwrap());
/// store.release(buf.handle().unwrap());
/// ```
///
/// ```compile_fail
/// use indirectbuf::prelude::*;
///
/// let store = HostStore::new(StoreConfig::default());
/// let buf = HostBuffer::with_storage(HostStorage::allocate_in(&store, 8).unwrap());
/// store.resize_region(buf.handle().unwrap(), 2).unwrap();
/// ```
pub struct HostStore {
    regions: DashMap<Handle, Vec<u8>>,
    free_handles: HandleQueue,
    next_handle: AtomicU32,
    config: StoreConfig,
    stats: StoreStatsInner,
}

impl HostStore {
    /// Creates a new, empty shared store.
    pub fn new(config: StoreConfig) -> Arc<Self> {
        Arc::new(Self {
            regions: DashMap::new(),
            free_handles: HandleQueue::new(),
            next_handle: AtomicU32::new(0),
            config,
            stats: StoreStatsInner::new(),
        })
    }

    /// The process-wide store backing [`HostStorage::allocate`](crate::HostStorage).
    pub fn global() -> &'static Arc<HostStore> {
        &GLOBAL_STORE
    }

    /// Configuration this store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates a zero-filled region of `len` bytes and returns its handle.
    ///
    /// # Errors
    ///
    /// - [`BufferError::HandlesExhausted`] if no handle can be minted
    /// - [`BufferError::StorageLimitExceeded`] if the byte limit would be passed
    /// - [`BufferError::AllocationFailed`] if the allocator refuses the request
    pub(crate) fn create_region(&self, len: usize) -> Result<Handle> {
        self.reserve_bytes(len, len)?;

        let mut bytes = Vec::new();
        if let Err(err) = resize_zeroed(&mut bytes, len) {
            tracing::debug!(len, "host region allocation failed");
            self.unreserve_bytes(len);
            return Err(err);
        }

        // Mint last so a failed creation never touches the handle space.
        let handle = match self.mint_handle() {
            Ok(handle) => handle,
            Err(err) => {
                self.unreserve_bytes(len);
                return Err(err);
            }
        };

        self.regions.insert(handle, bytes);
        tracing::trace!(%handle, len, "host region created");
        Ok(handle)
    }

    /// Wipes and removes a region, making its handle available again.
    ///
    /// Returns `false` if the handle did not name a live region.
    pub(crate) fn release(&self, handle: Handle) -> bool {
        let Some((_, mut bytes)) = self.regions.remove(&handle) else {
            return false;
        };
        let len = bytes.len();
        bytes.zeroize();
        self.unreserve_bytes(len);
        self.free_handles.push(handle);
        StoreStatsInner::bump(&self.stats.released);
        tracing::trace!(%handle, len, "host region released");
        true
    }

    /// Sets a region's length. Growth is zero-filled, shrinking wipes and
    /// frees the discarded tail.
    ///
    /// The region is left untouched when an error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not name a live region.
    pub(crate) fn resize_region(&self, handle: Handle, len: usize) -> Result<()> {
        let Some(mut region) = self.regions.get_mut(&handle) else {
            unknown_handle(handle)
        };
        let bytes = region.value_mut();
        let current = bytes.len();

        if len > current {
            let additional = len - current;
            self.reserve_bytes(additional, len)?;
            if let Err(err) = resize_zeroed(bytes, len) {
                tracing::debug!(%handle, from = current, to = len, "host region growth failed");
                self.unreserve_bytes(additional);
                return Err(err);
            }
        } else if len < current {
            resize_zeroed(bytes, len)?;
            bytes.shrink_to_fit();
            self.unreserve_bytes(current - len);
        }
        Ok(())
    }

    /// Current length of a region, or `None` if the handle is not live.
    pub fn region_len(&self, handle: Handle) -> Option<usize> {
        self.regions.get(&handle).map(|region| region.len())
    }

    /// Runs `f` over a region's bytes, or returns `None` if the handle is not
    /// live. This is how embedding glue locates the bytes behind a handle;
    /// the region stays owned by its buffer.
    ///
    /// `f` must not call back into this store.
    pub fn with_region<R>(&self, handle: Handle, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        self.regions.get(&handle).map(|region| f(region.value()))
    }

    /// Copies `out.len()` bytes starting at `offset` out of a region.
    pub(crate) fn read_range(&self, handle: Handle, offset: usize, out: &mut [u8]) {
        if out.is_empty() {
            return;
        }
        let Some(region) = self.regions.get(&handle) else {
            unknown_handle(handle)
        };
        out.copy_from_slice(&region[offset..offset + out.len()]);
    }

    /// Copies `bytes` into a region starting at `offset`.
    pub(crate) fn write_range(&self, handle: Handle, offset: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let Some(mut region) = self.regions.get_mut(&handle) else {
            unknown_handle(handle)
        };
        region[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Reads one byte of a region.
    pub(crate) fn read_byte(&self, handle: Handle, offset: usize) -> u8 {
        match self.regions.get(&handle) {
            Some(region) => region[offset],
            None => unknown_handle(handle),
        }
    }

    /// Writes one byte of a region.
    pub(crate) fn write_byte(&self, handle: Handle, offset: usize, byte: u8) {
        match self.regions.get_mut(&handle) {
            Some(mut region) => region[offset] = byte,
            None => unknown_handle(handle),
        }
    }

    /// Copies `len` bytes from one region range to another.
    ///
    /// When both handles are the same the ranges may overlap and the copy
    /// behaves like a move: every source byte is read before it is
    /// overwritten. Distinct handles never share bytes and are copied in
    /// staged chunks.
    pub(crate) fn copy_range(
        &self,
        from: Handle,
        from_offset: usize,
        to: Handle,
        to_offset: usize,
        len: usize,
    ) {
        if len == 0 {
            return;
        }

        if from == to {
            let Some(mut region) = self.regions.get_mut(&to) else {
                unknown_handle(to)
            };
            region.copy_within(from_offset..from_offset + len, to_offset);
            return;
        }

        // Two entries may share a shard, so never hold both guards at once.
        let mut staged = vec![0u8; len.min(COPY_CHUNK)];
        let mut done = 0;
        while done < len {
            let step = (len - done).min(COPY_CHUNK);
            let chunk = &mut staged[..step];
            self.read_range(from, from_offset + done, chunk);
            self.write_range(to, to_offset + done, chunk);
            done += step;
        }
        staged.zeroize();
    }

    /// Returns a snapshot of store statistics.
    ///
    /// All counters use `Relaxed` ordering; values are eventually consistent.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            live_handles: self.regions.len(),
            free_handles: self.free_handles.len(),
            bytes_in_use: self.stats.bytes_in_use.load(Ordering::Relaxed),
            minted: self.stats.minted.load(Ordering::Relaxed),
            released: self.stats.released.load(Ordering::Relaxed),
            recycled: self.stats.recycled.load(Ordering::Relaxed),
        }
    }

    fn mint_handle(&self) -> Result<Handle> {
        if let Some(handle) = self.free_handles.pop() {
            StoreStatsInner::bump(&self.stats.recycled);
            return Ok(handle);
        }

        let max = self.config.max_handles;
        let previous = self
            .next_handle
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < max).then_some(n + 1)
            })
            .map_err(|_| BufferError::HandlesExhausted)?;
        let handle = Handle::new(previous + 1).ok_or(BufferError::HandlesExhausted)?;
        StoreStatsInner::bump(&self.stats.minted);
        Ok(handle)
    }

    fn reserve_bytes(&self, additional: usize, requested: usize) -> Result<()> {
        let Some(limit) = self.config.byte_limit else {
            self.stats
                .bytes_in_use
                .fetch_add(additional, Ordering::Relaxed);
            return Ok(());
        };

        self.stats
            .bytes_in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(additional).filter(|&total| total <= limit)
            })
            .map(|_| ())
            .map_err(|_| {
                tracing::debug!(requested, limit, "host store byte limit reached");
                BufferError::StorageLimitExceeded { requested, limit }
            })
    }

    #[inline]
    fn unreserve_bytes(&self, len: usize) {
        self.stats.bytes_in_use.fetch_sub(len, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for HostStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostStore")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
