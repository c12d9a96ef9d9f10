// src/buffer/ops.rs
//! Element, range and bulk operations

use super::core::IndirectBuffer;
use crate::backend::StorageBackend;
use crate::error::{BufferError, Result};

impl<B: StorageBackend> IndirectBuffer<B> {
    /// Reads the byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    #[inline]
    #[track_caller]
    pub fn get(&self, index: usize) -> u8 {
        assert!(
            index < self.size(),
            "get: index {} out of bounds for buffer of size {}",
            index,
            self.size()
        );
        self.storage.read_byte(index)
    }

    /// Writes the byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.size()`.
    #[inline]
    #[track_caller]
    pub fn set(&mut self, index: usize, byte: u8) {
        assert!(
            index < self.size(),
            "set: index {} out of bounds for buffer of size {}",
            index,
            self.size()
        );
        self.storage.write_byte(index, byte);
    }

    /// Copies `out.len()` bytes starting at `index` into `out`.
    ///
    /// An empty `out` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `index + out.len() > self.size()`.
    #[track_caller]
    pub fn get_range(&self, index: usize, out: &mut [u8]) {
        self.check_range(index, out.len(), "get_range");
        if out.is_empty() {
            return;
        }
        self.storage.read_range(index, out);
    }

    /// Copies `bytes` into the buffer starting at `index`.
    ///
    /// An empty `bytes` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `index + bytes.len() > self.size()`.
    #[track_caller]
    pub fn set_range(&mut self, index: usize, bytes: &[u8]) {
        self.check_range(index, bytes.len(), "set_range");
        if bytes.is_empty() {
            return;
        }
        self.storage.write_range(index, bytes);
    }

    /// Moves `count` bytes from `old_index` to `new_index` inside this buffer.
    ///
    /// Overlapping ranges are handled like `memmove`: the result equals
    /// copying the source range out first and then writing it back.
    ///
    /// # Panics
    ///
    /// Panics unless both ranges lie inside the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let mut buf = Buffer::from_text("abcde")?;
    /// buf.move_range(1, 2, 2);
    /// assert_eq!(buf.to_vec(), b"acdde");
    /// # Ok::<(), BufferError>(())
    /// ```
    #[track_caller]
    pub fn move_range(&mut self, new_index: usize, old_index: usize, count: usize) {
        self.check_range(old_index, count, "move_range source");
        self.check_range(new_index, count, "move_range destination");
        if new_index == old_index || count == 0 {
            return;
        }
        self.storage.copy_within(old_index, new_index, count);
    }

    /// Copies `count` bytes at `from_index` to `to_index` within this buffer.
    ///
    /// Source and destination are the same region, so this is
    /// [`move_range`](Self::move_range) and overlap is safe.
    #[track_caller]
    pub fn copy_within(&mut self, to_index: usize, count: usize, from_index: usize) {
        self.move_range(to_index, from_index, count);
    }

    /// Copies `count` bytes of `source` starting at `from_index` into this
    /// buffer at `to_index`. `source` is left unchanged.
    ///
    /// Two live buffers never share storage, so no overlap handling is
    /// needed; a copy inside one buffer is [`copy_within`](Self::copy_within).
    ///
    /// # Panics
    ///
    /// Panics if `from_index + count > source.size()` or
    /// `to_index + count > self.size()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let source = Buffer::from_text("abcde")?;
    /// let mut target = Buffer::from_text("fghijk")?;
    /// target.copy_from(3, 2, &source, 1);
    /// assert_eq!(target.to_vec(), b"fghbck");
    /// # Ok::<(), BufferError>(())
    /// ```
    #[track_caller]
    pub fn copy_from(&mut self, to_index: usize, count: usize, source: &Self, from_index: usize) {
        source.check_range(from_index, count, "copy_from source");
        self.check_range(to_index, count, "copy_from destination");
        if count == 0 {
            return;
        }
        self.storage.copy_from(to_index, &source.storage, from_index, count);
    }

    /// Builds a new buffer holding every input laid end to end.
    ///
    /// Inputs are not modified. Empty inputs contribute nothing and an empty
    /// list yields an empty buffer. The result is allocated alongside the
    /// first input.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined length cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let head = Buffer::from_text("abc")?;
    /// let tail = Buffer::from_text("de")?;
    /// let all = Buffer::concat(&[&head, &tail])?;
    /// assert_eq!(all.to_string_lossy(), "abcde");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn concat(buffers: &[&Self]) -> Result<Self> {
        let total = buffers
            .iter()
            .try_fold(0usize, |sum, buffer| sum.checked_add(buffer.size()))
            .ok_or(BufferError::AllocationFailed {
                requested: usize::MAX,
            })?;

        let mut result = match buffers.first() {
            Some(first) => Self::with_storage(first.storage.allocate_sibling(total)?),
            None => return Ok(Self::new()),
        };

        let mut index = 0;
        for buffer in buffers {
            result.copy_from(index, buffer.size(), buffer, 0);
            index += buffer.size();
        }
        Ok(result)
    }

    /// Copies the whole buffer into a `Vec`.
    ///
    /// Meant for small buffers and diagnostics.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.size()];
        self.get_range(0, &mut bytes);
        bytes
    }

    /// Copies the whole buffer into a `String`, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        match String::from_utf8(self.to_vec()) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::{HostBuffer, InlineBuffer};

    #[test]
    fn test_get_and_set() {
        let mut buf = InlineBuffer::with_size(8).unwrap();
        buf.set(3, 0x7F);
        buf.set(4, 0x80);
        buf.set(5, 0xFF);
        assert_eq!(buf.to_vec(), [0, 0, 0, 0x7F, 0x80, 0xFF, 0, 0]);
    }

    #[test]
    fn test_range_roundtrip_f32() {
        let mut buf = HostBuffer::with_size(8).unwrap();
        let value = std::f32::consts::PI.to_ne_bytes();
        buf.set_range(2, &value);
        assert_eq!(buf.get(1), 0);
        assert_eq!(buf.get(6), 0);

        let mut out = [0u8; 4];
        buf.get_range(2, &mut out);
        assert_eq!(f32::from_ne_bytes(out), std::f32::consts::PI);
    }

    #[test]
    fn test_empty_ranges_are_noops() {
        let mut buf = InlineBuffer::from_text("abc").unwrap();
        buf.set_range(3, &[]);
        buf.get_range(3, &mut []);
        buf.move_range(0, 3, 0);
        assert_eq!(buf.to_vec(), b"abc");
    }

    #[test]
    fn test_copy_within_matches_move_range() {
        let mut moved = HostBuffer::from_text("abcde").unwrap();
        let mut copied = HostBuffer::from_text("abcde").unwrap();
        moved.move_range(2, 1, 2);
        copied.copy_within(2, 2, 1);
        assert_eq!(moved.to_vec(), b"abbce");
        assert_eq!(copied.to_vec(), moved.to_vec());
    }

    #[test]
    fn test_concat_empty_list() {
        let all = InlineBuffer::concat(&[]).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_to_string_lossy_replaces_invalid() {
        let buf = InlineBuffer::from_bytes(&[b'o', b'k', 0xFF]).unwrap();
        assert_eq!(buf.to_string_lossy(), "ok\u{FFFD}");
    }

    #[test]
    #[should_panic(expected = "get: index 2 out of bounds")]
    fn test_get_out_of_bounds() {
        let buf = InlineBuffer::with_size(2).unwrap();
        buf.get(2);
    }

    #[test]
    #[should_panic(expected = "set_range")]
    fn test_set_range_out_of_bounds() {
        let mut buf = HostBuffer::with_size(4).unwrap();
        buf.set_range(2, b"abc");
    }

    #[test]
    #[should_panic(expected = "move_range destination")]
    fn test_move_range_destination_out_of_bounds() {
        let mut buf = InlineBuffer::with_size(5).unwrap();
        buf.move_range(4, 0, 2);
    }

    #[test]
    #[should_panic(expected = "copy_from source")]
    fn test_copy_from_source_out_of_bounds() {
        let source = InlineBuffer::with_size(2).unwrap();
        let mut target = InlineBuffer::with_size(8).unwrap();
        target.copy_from(0, 3, &source, 0);
    }
}
