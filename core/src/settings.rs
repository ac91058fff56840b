//! `EngineConfig` - tunables for a [`SemanticContext`](crate::SemanticContext)

use crate::MatcherError;
use std::num::NonZeroUsize;

/// Default number of memoized entries kept per compilation.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

pub(crate) const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_CAPACITY) {
    Some(capacity) => capacity,
    None => panic!("default cache capacity must be non-zero"),
};

/// Engine configuration.
///
/// Deserializable with the `serde` feature; missing fields take their defaults.
///
/// ```
/// use arbor::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.cache_capacity, 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    /// Upper bound on entries in the per-compilation cache.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Check the configuration and return the cache bound.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] if `cache_capacity` is zero.
    pub fn validate(&self) -> Result<NonZeroUsize, MatcherError> {
        NonZeroUsize::new(self.cache_capacity).ok_or_else(|| MatcherError::InvalidConfig {
            reason: "cache_capacity must be greater than zero".into(),
        })
    }
}
