// src/error.rs
//! Error types for storage allocation with conversion support
//!
//! Only resource exhaustion is reported through [`BufferError`]. Out-of-range
//! indices are caller bugs and panic instead.

use std::fmt;

/// Errors that can occur while acquiring storage for a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not provide the requested number of bytes
    AllocationFailed {
        /// Total length that was requested
        requested: usize,
    },
    /// The host store would exceed its configured byte limit
    StorageLimitExceeded {
        /// Total length that was requested for the region
        requested: usize,
        /// Configured byte limit of the store
        limit: usize,
    },
    /// The host store has no handle left to mint
    HandlesExhausted,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "Failed to allocate {} bytes", requested)
            }
            Self::StorageLimitExceeded { requested, limit } => write!(
                f,
                "Region of {} bytes would exceed the store limit of {} bytes",
                requested, limit
            ),
            Self::HandlesExhausted => write!(f, "Host store has no free handles"),
        }
    }
}

impl std::error::Error for BufferError {}

// ============================================================================
// ERROR CONVERSION
// ============================================================================

/// Convert BufferError to std::io::Error
impl From<BufferError> for std::io::Error {
    fn from(err: BufferError) -> Self {
        use std::io::ErrorKind;
        match err {
            BufferError::AllocationFailed { .. } | BufferError::StorageLimitExceeded { .. } => {
                std::io::Error::new(ErrorKind::OutOfMemory, err)
            }
            BufferError::HandlesExhausted => std::io::Error::new(ErrorKind::Other, err),
        }
    }
}

/// Convert BufferError to anyhow::Error
#[cfg(feature = "anyhow")]
impl From<BufferError> for anyhow::Error {
    fn from(err: BufferError) -> Self {
        anyhow::anyhow!("{}", err)
    }
}

/// Result type alias for buffer operations
pub type Result<T> = std::result::Result<T, BufferError>;

// ============================================================================
// EXTENSION TRAIT FOR EASY CONVERSION
// ============================================================================

/// Extension trait for converting Results between different error types
pub trait ResultExt<T> {
    /// Convert to anyhow::Result
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T>;

    /// Convert to io::Result
    fn into_io(self) -> std::io::Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    #[cfg(feature = "anyhow")]
    fn into_anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| e.into())
    }

    fn into_io(self) -> std::io::Result<T> {
        self.map_err(|e| e.into())
    }
}

/// Converts the error of a buffer operation into another error type.
///
/// The one-argument form targets `std::io::Error`; pass the target type
/// explicitly for anything else.
///
/// # Example
/// ```ignore
/// use indirectbuf::prelude::*;
/// use indirectbuf::buffer_op;
///
/// fn load() -> std::io::Result<IndirectBuffer> {
///     buffer_op!(IndirectBuffer::from_bytes(b"payload"))
/// }
/// ```
#[macro_export]
macro_rules! buffer_op {
    ($expr:expr, $target:ty) => {
        $expr.map_err(|e: $crate::BufferError| -> $target { e.into() })
    };
    ($expr:expr) => {
        $expr.map_err(|e: $crate::BufferError| -> std::io::Error { e.into() })
    };
}
