// src/buffer/unsafe_ops.rs
//! Unchecked (unsafe) element access for hot loops

use super::core::IndirectBuffer;
use crate::backend::StorageBackend;

impl<B: StorageBackend> IndirectBuffer<B> {
    /// Reads the byte at `index` without bounds checking.
    ///
    /// Checked with `debug_assert!` only.
    ///
    /// # Safety
    ///
    /// Caller MUST guarantee: `index < self.size()`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> u8 {
        debug_assert!(
            index < self.size(),
            "get_unchecked: index {} >= size {}",
            index,
            self.size()
        );
        unsafe { self.storage.read_byte_unchecked(index) }
    }

    /// Writes the byte at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// Caller MUST guarantee: `index < self.size()`.
    #[inline(always)]
    pub unsafe fn set_unchecked(&mut self, index: usize, byte: u8) {
        debug_assert!(
            index < self.size(),
            "set_unchecked: index {} >= size {}",
            index,
            self.size()
        );
        unsafe { self.storage.write_byte_unchecked(index, byte) };
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::{HostBuffer, InlineBuffer};

    #[test]
    fn test_unchecked_matches_checked() {
        let mut inline = InlineBuffer::with_size(4).unwrap();
        let mut host = HostBuffer::with_size(4).unwrap();
        for i in 0..4 {
            unsafe {
                inline.set_unchecked(i, i as u8 * 3);
                host.set_unchecked(i, i as u8 * 3);
            }
        }
        for i in 0..4 {
            assert_eq!(unsafe { inline.get_unchecked(i) }, inline.get(i));
            assert_eq!(unsafe { host.get_unchecked(i) }, host.get(i));
        }
    }
}
