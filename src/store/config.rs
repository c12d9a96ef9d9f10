// src/store/config.rs
//! Configuration for host stores

/// Configuration for [`HostStore`](super::HostStore) limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of bytes held across all regions (`None` = unbounded)
    pub byte_limit: Option<usize>,
    /// Highest handle value the store may mint
    pub max_handles: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl StoreConfig {
    /// No byte limit and the full handle space.
    pub fn unlimited() -> Self {
        Self {
            byte_limit: None,
            max_handles: u32::MAX,
        }
    }

    /// Caps the total number of bytes held by the store.
    ///
    /// # Examples
    ///
    /// ```
    /// use indirectbuf::StoreConfig;
    ///
    /// let config = StoreConfig::limited(256 * 1024 * 1024);
    /// assert_eq!(config.byte_limit, Some(256 * 1024 * 1024));
    /// ```
    pub fn limited(byte_limit: usize) -> Self {
        Self {
            byte_limit: Some(byte_limit),
            ..Self::unlimited()
        }
    }
}
