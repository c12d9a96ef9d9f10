// src/backend/inline.rs
//! In-process storage: the bytes live in an ordinary `Vec<u8>`.

use super::{StorageBackend, resize_zeroed};
use crate::error::Result;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Backend keeping a buffer's bytes on the process heap.
///
/// The bytes are wiped with [`zeroize`] on drop.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct InlineStorage {
    bytes: Vec<u8>,
}

impl InlineStorage {
    /// Borrows the stored bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl StorageBackend for InlineStorage {
    #[inline]
    fn empty() -> Self {
        Self::default()
    }

    fn allocate(len: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        resize_zeroed(&mut bytes, len)?;
        Ok(Self { bytes })
    }

    /// Adopts the vector without copying; the caller gives up its bytes.
    fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self { bytes })
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn resize(&mut self, len: usize) -> Result<()> {
        resize_zeroed(&mut self.bytes, len)
    }

    #[inline]
    fn read_byte(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    #[inline]
    fn write_byte(&mut self, offset: usize, byte: u8) {
        self.bytes[offset] = byte;
    }

    #[inline]
    fn read_range(&self, offset: usize, out: &mut [u8]) {
        out.copy_from_slice(&self.bytes[offset..offset + out.len()]);
    }

    #[inline]
    fn write_range(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    #[inline]
    fn copy_within(&mut self, from: usize, to: usize, count: usize) {
        self.bytes.copy_within(from..from + count, to);
    }

    #[inline]
    fn copy_from(&mut self, to: usize, source: &Self, from: usize, count: usize) {
        self.bytes[to..to + count].copy_from_slice(&source.bytes[from..from + count]);
    }

    #[inline(always)]
    unsafe fn read_byte_unchecked(&self, offset: usize) -> u8 {
        debug_assert!(
            offset < self.bytes.len(),
            "read_byte_unchecked: offset {} >= len {}",
            offset,
            self.bytes.len()
        );
        unsafe { *self.bytes.get_unchecked(offset) }
    }

    #[inline(always)]
    unsafe fn write_byte_unchecked(&mut self, offset: usize, byte: u8) {
        debug_assert!(
            offset < self.bytes.len(),
            "write_byte_unchecked: offset {} >= len {}",
            offset,
            self.bytes.len()
        );
        unsafe { *self.bytes.get_unchecked_mut(offset) = byte };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let storage = InlineStorage::allocate(32).unwrap();
        assert_eq!(storage.len(), 32);
        assert!(storage.as_slice().iter().all(|&b| b == 0));
        assert_eq!(storage.handle(), None);
    }

    #[test]
    fn test_from_vec_adopts_bytes() {
        let storage = InlineStorage::from_vec(vec![1, 2, 3]).unwrap();
        assert_eq!(storage.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_copy_within_overlapping() {
        let mut storage = InlineStorage::from_vec(b"abcde".to_vec()).unwrap();
        storage.copy_within(2, 1, 2);
        assert_eq!(storage.as_slice(), b"acdde");
    }

    #[test]
    fn test_zeroize_clears_storage() {
        let mut storage = InlineStorage::from_vec(vec![0xAA; 16]).unwrap();
        storage.zeroize();
        assert!(storage.is_empty());
    }
}
