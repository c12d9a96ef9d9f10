// src/backend/mod.rs
//! Storage backends behind [`IndirectBuffer`](crate::IndirectBuffer).
//!
//! A backend owns the bytes of exactly one buffer. The buffer validates every
//! index before calling in, so backends may assume in-range arguments; they
//! still index through checked slices and never touch memory out of bounds.

pub mod external;
pub mod inline;

pub use external::HostStorage;
pub use inline::InlineStorage;

use crate::error::{BufferError, Result};
use std::fmt;
use std::num::NonZeroU32;
use zeroize::Zeroize;

/// Backend used by `IndirectBuffer` when no type parameter is given.
#[cfg(not(feature = "external"))]
pub type DefaultStorage = InlineStorage;

/// Backend used by `IndirectBuffer` when no type parameter is given.
#[cfg(feature = "external")]
pub type DefaultStorage = HostStorage;

/// Opaque, non-zero identifier of a region in a [`HostStore`](crate::HostStore).
///
/// Zero is never a valid handle; "no external backing" is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Wraps a raw handle value, returning `None` for zero.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw integer to pass across the host boundary.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte storage for a single buffer.
///
/// Release happens in `Drop`. Implementations must give every value its own
/// region: two live values never share bytes.
pub trait StorageBackend: Sized {
    /// Storage of length zero. Must not fail.
    fn empty() -> Self;

    /// Zero-filled storage of `len` bytes.
    fn allocate(len: usize) -> Result<Self>;

    /// Zero-filled storage of `len` bytes placed alongside `self`
    /// (for example in the same host store).
    fn allocate_sibling(&self, len: usize) -> Result<Self> {
        Self::allocate(len)
    }

    /// Storage holding `bytes`.
    fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        let mut storage = Self::allocate(bytes.len())?;
        storage.write_range(0, &bytes);
        Ok(storage)
    }

    /// Current length in bytes.
    fn len(&self) -> usize;

    /// Returns `true` when the storage holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets the length. New bytes are zero; discarded bytes must not come
    /// back on a later grow. On error the storage is unchanged.
    fn resize(&mut self, len: usize) -> Result<()>;

    /// Reads the byte at `offset`.
    fn read_byte(&self, offset: usize) -> u8;

    /// Writes the byte at `offset`.
    fn write_byte(&mut self, offset: usize, byte: u8);

    /// Fills `out` from `offset`.
    fn read_range(&self, offset: usize, out: &mut [u8]);

    /// Copies `bytes` in at `offset`.
    fn write_range(&mut self, offset: usize, bytes: &[u8]);

    /// Moves `count` bytes from `from` to `to`; the ranges may overlap.
    fn copy_within(&mut self, from: usize, to: usize, count: usize);

    /// Copies `count` bytes from `source` at `from` into `self` at `to`.
    fn copy_from(&mut self, to: usize, source: &Self, from: usize, count: usize);

    /// Host handle of the region, if the bytes live outside the process heap.
    fn handle(&self) -> Option<Handle> {
        None
    }

    /// Reads a byte without the backend's own checks.
    ///
    /// # Safety
    ///
    /// Caller must guarantee `offset < self.len()`.
    #[inline]
    unsafe fn read_byte_unchecked(&self, offset: usize) -> u8 {
        self.read_byte(offset)
    }

    /// Writes a byte without the backend's own checks.
    ///
    /// # Safety
    ///
    /// Caller must guarantee `offset < self.len()`.
    #[inline]
    unsafe fn write_byte_unchecked(&mut self, offset: usize, byte: u8) {
        self.write_byte(offset, byte)
    }
}

/// Resizes `bytes` to `len`, zero-filling growth and wiping a discarded tail.
///
/// Growth reserves first, so `bytes` is untouched if the allocator refuses.
pub(crate) fn resize_zeroed(bytes: &mut Vec<u8>, len: usize) -> Result<()> {
    let current = bytes.len();
    if len > current {
        bytes
            .try_reserve_exact(len - current)
            .map_err(|_| BufferError::AllocationFailed { requested: len })?;
        bytes.resize(len, 0);
    } else {
        bytes[len..].zeroize();
        bytes.truncate(len);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rejects_zero() {
        assert!(Handle::new(0).is_none());
        assert_eq!(Handle::new(7).map(Handle::get), Some(7));
    }

    #[test]
    fn test_resize_zeroed_wipes_tail() {
        let mut bytes = vec![9u8; 8];
        resize_zeroed(&mut bytes, 3).unwrap();
        assert_eq!(bytes, [9, 9, 9]);

        // Capacity is retained, but the regrown tail must be fresh zeros.
        resize_zeroed(&mut bytes, 8).unwrap();
        assert_eq!(bytes, [9, 9, 9, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_resize_zeroed_refuses_impossible_growth() {
        let mut bytes = vec![1u8; 4];
        let err = resize_zeroed(&mut bytes, usize::MAX).unwrap_err();
        assert_eq!(
            err,
            BufferError::AllocationFailed {
                requested: usize::MAX
            }
        );
        assert_eq!(bytes, [1, 1, 1, 1]);
    }
}
