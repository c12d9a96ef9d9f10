// src/backend/external.rs
//! External storage: the bytes live in a [`HostStore`] and the buffer only
//! keeps a handle plus a cached length.

use super::{Handle, StorageBackend};
use crate::error::Result;
use crate::store::HostStore;
use std::sync::Arc;
use zeroize::Zeroize;

/// Backend keeping a buffer's bytes in a [`HostStore`].
///
/// The handle is minted when a region is first needed, so an empty buffer
/// made with [`StorageBackend::empty`] costs nothing until it grows. Dropping
/// the storage releases its region.
pub struct HostStorage {
    store: Arc<HostStore>,
    handle: Option<Handle>,
    /// Mirror of the region's length; updated only after the store succeeds.
    len: usize,
}

impl HostStorage {
    /// Allocates a zero-filled region of `len` bytes in `store`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::prelude::*;
    ///
    /// let store = HostStore::new(StoreConfig::limited(1024));
    /// let buf = IndirectBuffer::with_storage(HostStorage::allocate_in(&store, 100)?);
    /// assert_eq!(buf.size(), 100);
    /// assert_eq!(store.stats().bytes_in_use, 100);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn allocate_in(store: &Arc<HostStore>, len: usize) -> Result<Self> {
        let handle = store.create_region(len)?;
        Ok(Self {
            store: Arc::clone(store),
            handle: Some(handle),
            len,
        })
    }

    /// The store holding this region.
    pub fn store(&self) -> &Arc<HostStore> {
        &self.store
    }

    #[inline]
    #[track_caller]
    fn region(&self) -> Handle {
        match self.handle {
            Some(handle) => handle,
            None => panic!("host storage of length {} has no region", self.len),
        }
    }
}

impl StorageBackend for HostStorage {
    fn empty() -> Self {
        Self {
            store: Arc::clone(HostStore::global()),
            handle: None,
            len: 0,
        }
    }

    fn allocate(len: usize) -> Result<Self> {
        Self::allocate_in(HostStore::global(), len)
    }

    fn allocate_sibling(&self, len: usize) -> Result<Self> {
        Self::allocate_in(&self.store, len)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    fn resize(&mut self, len: usize) -> Result<()> {
        match self.handle {
            Some(handle) => self.store.resize_region(handle, len)?,
            None if len == 0 => {}
            None => self.handle = Some(self.store.create_region(len)?),
        }
        self.len = len;
        Ok(())
    }

    fn read_byte(&self, offset: usize) -> u8 {
        self.store.read_byte(self.region(), offset)
    }

    fn write_byte(&mut self, offset: usize, byte: u8) {
        self.store.write_byte(self.region(), offset, byte);
    }

    fn read_range(&self, offset: usize, out: &mut [u8]) {
        if !out.is_empty() {
            self.store.read_range(self.region(), offset, out);
        }
    }

    fn write_range(&mut self, offset: usize, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.store.write_range(self.region(), offset, bytes);
        }
    }

    fn copy_within(&mut self, from: usize, to: usize, count: usize) {
        if count > 0 {
            let handle = self.region();
            self.store.copy_range(handle, from, handle, to, count);
        }
    }

    fn copy_from(&mut self, to: usize, source: &Self, from: usize, count: usize) {
        if count == 0 {
            return;
        }
        if Arc::ptr_eq(&self.store, &source.store) {
            self.store.copy_range(source.region(), from, self.region(), to, count);
        } else {
            // Regions in different stores: go through process memory.
            let mut staged = vec![0u8; count];
            source.read_range(from, &mut staged);
            self.write_range(to, &staged);
            staged.zeroize();
        }
    }

    #[inline]
    fn handle(&self) -> Option<Handle> {
        self.handle
    }
}

impl Drop for HostStorage {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.store.release(handle);
        }
    }
}
