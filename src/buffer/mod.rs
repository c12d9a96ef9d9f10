// src/buffer/mod.rs
//! Move-only byte buffer over a pluggable storage backend

pub mod core;
pub(crate) mod ops;
pub(crate) mod unsafe_ops;

pub use self::core::{Buffer, HostBuffer, IndirectBuffer, InlineBuffer};
