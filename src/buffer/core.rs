// src/buffer/core.rs
//! Core buffer structure, lifecycle and sizing
//!
//! This module provides the [`IndirectBuffer`] type: an owned, move-only byte
//! region whose bytes are held by a [`StorageBackend`].

use crate::backend::{DefaultStorage, Handle, HostStorage, InlineStorage, StorageBackend};
use crate::error::Result;
use std::fmt;

/// Buffer using the backend selected at build time (`external` feature).
pub type Buffer = IndirectBuffer<DefaultStorage>;
/// Buffer whose bytes live on the process heap.
pub type InlineBuffer = IndirectBuffer<InlineStorage>;
/// Buffer whose bytes live in a [`HostStore`](crate::HostStore).
pub type HostBuffer = IndirectBuffer<HostStorage>;

/// A resizable byte buffer that is never duplicated implicitly.
///
/// The type is not `Copy`; moving it transfers ownership of its storage.
/// The type is not `Clone` either: duplicating the bytes only happens
/// through [`try_clone`](Self::try_clone), so every large copy is visible at
/// the call site and can report exhaustion.
///
/// ```compile_fail
/// use indirectbuf::InlineBuffer;
///
/// let original = InlineBuffer::with_size(16).unwrap();
/// let copy = original.clone();
/// ```
///
/// Indices are checked on every access. An out-of-range index or count is a
/// bug in the caller and panics; only storage exhaustion is reported as a
/// [`BufferError`](crate::BufferError).
///
/// # Examples
///
/// ```
/// use indirectbuf::Buffer;
/// # use indirectbuf::BufferError;
///
/// let mut buf = Buffer::with_size(4)?;
/// buf.set_range(0, b"abc");
/// assert_eq!(buf.get(1), b'b');
/// assert_eq!(buf.get(3), 0);
/// # Ok::<(), BufferError>(())
/// ```
pub struct IndirectBuffer<B: StorageBackend = DefaultStorage> {
    pub(crate) storage: B,
}

impl<B: StorageBackend> IndirectBuffer<B> {
    /// Creates an empty buffer. Never allocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    ///
    /// let buf = Buffer::new();
    /// assert!(buf.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: B::empty(),
        }
    }

    /// Creates a zero-filled buffer of `count` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot provide `count` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let buf = Buffer::with_size(8192)?;
    /// assert_eq!(buf.size(), 8192);
    /// assert_eq!(buf.get(8191), 0);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn with_size(count: usize) -> Result<Self> {
        Ok(Self {
            storage: B::allocate(count)?,
        })
    }

    /// Creates a buffer holding a copy of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let data = [123u8, 234];
    /// let buf = Buffer::from_bytes(&data)?;
    /// assert_eq!(buf.to_vec(), data);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::with_size(bytes.len())?;
        buffer.set_range(0, bytes);
        Ok(buffer)
    }

    /// Creates a buffer holding the UTF-8 bytes of `text`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Creates a buffer from an owned vector.
    ///
    /// The inline backend adopts the vector; other backends copy it in.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            storage: B::from_vec(bytes)?,
        })
    }

    /// Wraps storage that was allocated elsewhere, e.g. in a specific
    /// [`HostStore`](crate::HostStore).
    #[inline]
    pub fn with_storage(storage: B) -> Self {
        Self { storage }
    }

    /// Borrows the backend.
    #[inline]
    pub fn storage(&self) -> &B {
        &self.storage
    }

    /// Consumes the buffer and returns its backend.
    #[inline]
    pub fn into_storage(self) -> B {
        self.storage
    }

    /// Returns the length in bytes.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Sets the length to `count` bytes.
    ///
    /// Growth zero-fills the new tail. Shrinking discards the tail; a later
    /// grow yields zeros again, never the discarded bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot provide the new length. The
    /// buffer keeps its previous size and content in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let mut buf = Buffer::from_text("secret")?;
    /// buf.resize(2)?;
    /// buf.resize(6)?;
    /// assert_eq!(buf.to_vec(), b"se\0\0\0\0");
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn resize(&mut self, count: usize) -> Result<()> {
        self.storage.resize(count)
    }

    /// Duplicates the buffer into a fully independent region.
    ///
    /// The copy is placed alongside the original (the same host store for
    /// external storage).
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let mut original = Buffer::from_bytes(&[123, 234])?;
    /// let copy = original.try_clone()?;
    /// original.set(0, 1);
    /// assert_eq!(copy.get(0), 123);
    /// # Ok::<(), BufferError>(())
    /// ```
    pub fn try_clone(&self) -> Result<Self> {
        let mut result = Self {
            storage: self.storage.allocate_sibling(self.size())?,
        };
        result.copy_from(0, self.size(), self, 0);
        Ok(result)
    }

    /// Moves the contents out, leaving `self` as a valid empty buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::Buffer;
    /// # use indirectbuf::BufferError;
    ///
    /// let mut first = Buffer::from_bytes(&[123, 234])?;
    /// let second = first.take();
    /// assert_eq!(first.size(), 0);
    /// assert_eq!(second.to_vec(), [123, 234]);
    /// # Ok::<(), BufferError>(())
    /// ```
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::new())
    }

    /// Exchanges the storage of two buffers in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.storage, &mut other.storage);
    }

    /// Opaque handle locating the bytes in a host store, or `None` when the
    /// buffer has no external backing.
    #[inline]
    pub fn handle(&self) -> Option<Handle> {
        self.storage.handle()
    }

    #[inline]
    #[track_caller]
    pub(crate) fn check_range(&self, index: usize, count: usize, op: &str) {
        let size = self.size();
        let in_bounds = index.checked_add(count).is_some_and(|end| end <= size);
        assert!(
            in_bounds,
            "{}: range {}..{}+{} out of bounds for buffer of size {}",
            op, index, index, count, size
        );
    }
}

impl<B: StorageBackend> Default for IndirectBuffer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: StorageBackend> fmt::Debug for IndirectBuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndirectBuffer")
            .field("size", &self.size())
            .field("handle", &self.handle())
            .finish()
    }
}

impl<B: StorageBackend> TryFrom<&[u8]> for IndirectBuffer<B> {
    type Error = crate::BufferError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl<B: StorageBackend> TryFrom<&str> for IndirectBuffer<B> {
    type Error = crate::BufferError;

    fn try_from(text: &str) -> Result<Self> {
        Self::from_text(text)
    }
}

impl<B: StorageBackend> TryFrom<Vec<u8>> for IndirectBuffer<B> {
    type Error = crate::BufferError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_vec(bytes)
    }
}
