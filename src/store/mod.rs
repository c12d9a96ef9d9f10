// src/store/mod.rs
//! Handle-addressed byte store that holds regions outside the buffer itself.

pub(crate) mod config;
pub(crate) mod host;
pub(crate) mod stats;

pub use config::StoreConfig;
pub use host::HostStore;
pub use stats::StoreStats;
