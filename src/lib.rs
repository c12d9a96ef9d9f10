// src/lib.rs
//! # Indirect Buffer Library
//!
//! Move-only byte buffers whose storage can live outside the process heap.
//!
//! Some hosts (32-bit browser builds in particular) cannot reliably hand out
//! very large contiguous allocations. An [`IndirectBuffer`] keeps its bytes in
//! a [`StorageBackend`]: either inline on the heap ([`InlineStorage`]) or in a
//! handle-addressed [`HostStore`] ([`HostStorage`]). The buffer logic (bounds
//! checks, overlap-safe moves, concatenation) is the same for both.
//!
//! Features:
//! - No implicit duplication: buffers are not `Clone`; copies go through `try_clone`
//! - Bounds checked on every access; out-of-range indices panic
//! - Overlap-safe `move_range` and same-handle `copy_range`
//! - Discarded and released bytes are wiped with `zeroize`
//! - `external` cargo feature makes [`HostStorage`] the default backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod buffer;
pub mod error;
pub mod store;

// Re-export main types
pub use backend::{DefaultStorage, Handle, HostStorage, InlineStorage, StorageBackend};
pub use buffer::{Buffer, HostBuffer, IndirectBuffer, InlineBuffer};
pub use error::{BufferError, Result, ResultExt};
pub use store::{HostStore, StoreConfig, StoreStats};

/// Commonly used imports.
pub mod prelude {
    pub use crate::backend::{Handle, HostStorage, InlineStorage, StorageBackend};
    pub use crate::buffer::{Buffer, HostBuffer, IndirectBuffer, InlineBuffer};
    pub use crate::error::{BufferError, Result, ResultExt};
    pub use crate::store::{HostStore, StoreConfig, StoreStats};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_default_backend() {
        let buf = Buffer::with_size(4).unwrap();
        assert_eq!(buf.handle().is_some(), cfg!(feature = "external"));
    }

    #[test]
    fn test_host_buffer_lifecycle() {
        let store = HostStore::new(StoreConfig::default());
        let handle;
        {
            let mut buf = HostBuffer::with_storage(HostStorage::allocate_in(&store, 0).unwrap());
            handle = buf.handle().unwrap();
            buf.resize(1024).unwrap();
            buf.set_range(0, b"host");
            assert_eq!(
                store.with_region(handle, |bytes| bytes[..4].to_vec()),
                Some(b"host".to_vec())
            );
        }
        assert_eq!(store.region_len(handle), None);
        assert_eq!(store.stats().bytes_in_use, 0);
    }

    #[test]
    fn test_inline_and_host_agree() {
        let mut inline = InlineBuffer::from_text("abcdef").unwrap();
        let mut host = HostBuffer::from_text("abcdef").unwrap();

        inline.move_range(0, 2, 4);
        host.move_range(0, 2, 4);
        inline.resize(8).unwrap();
        host.resize(8).unwrap();

        assert_eq!(inline.to_vec(), host.to_vec());
        assert_eq!(inline.to_vec(), b"cdefef\0\0");
    }
}
