//! `CompilationCache` - bounded memoization scoped to one compilation
//!
//! Values are keyed by any `Hash + Eq` key. Keys are erased at insertion
//! (the same `as_any` downcast trick used for custom key types elsewhere), so
//! one cache serves unrelated callers without them coordinating on a key type.
//!
//! # Eviction
//!
//! Least-recently-used, bounded by [`EngineConfig::cache_capacity`](crate::EngineConfig).
//! An evicted entry is simply recomputed on the next lookup, which is sound
//! because every memoized computation must be a pure function of its key.

use lru::LruCache;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

trait ErasedKey: Send + Sync + Debug {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ErasedKey) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<K> ErasedKey for K
where
    K: Hash + Eq + Send + Sync + Debug + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedKey) -> bool {
        other.as_any().downcast_ref::<K>() == Some(self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<K>().hash(&mut state);
        self.hash(&mut state);
    }
}

struct CacheKey(Box<dyn ErasedKey>);

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(&*other.0)
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

type CacheValue = Arc<dyn Any + Send + Sync>;

/// Thread-safe, bounded, content-addressed memo table.
///
/// Owned by exactly one [`SemanticContext`](crate::SemanticContext); results
/// never leak across compilations.
///
/// # Example
///
/// ```
/// use arbor::CompilationCache;
/// use std::num::NonZeroUsize;
///
/// let cache = CompilationCache::new(NonZeroUsize::new(8).unwrap());
/// let first = cache.get_or_insert_with(("resolve", "java.lang.String"), || 42_u32);
/// let second = cache.get_or_insert_with(("resolve", "java.lang.String"), || unreachable!());
/// assert_eq!(first, second);
/// ```
pub struct CompilationCache {
    entries: Mutex<LruCache<CacheKey, CacheValue>>,
}

impl CompilationCache {
    /// Create an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// The value type is part of the key: the same `key` used with two
    /// different `V` types occupies two entries.
    ///
    /// The lock is not held while `compute` runs, so `compute` may itself
    /// memoize through this cache. Two threads missing on the same key may both
    /// compute; both results are equal by the purity requirement.
    pub fn get_or_insert_with<K, V, F>(&self, key: K, compute: F) -> V
    where
        K: Hash + Eq + Send + Sync + Debug + 'static,
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> V,
    {
        let key = CacheKey(Box::new((key, TypeId::of::<V>())));

        if let Some(hit) = self
            .entries
            .lock()
            .get(&key)
            .and_then(|value| value.downcast_ref::<V>().cloned())
        {
            return hit;
        }

        let value = compute();
        let mut entries = self.entries.lock();
        if !entries.contains(&key) && entries.len() == entries.cap().get() {
            tracing::debug!(
                capacity = entries.cap().get(),
                "evicting least-recently-used memo entry"
            );
        }
        entries.put(key, Arc::new(value.clone()));
        value
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries before eviction.
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.lock().cap()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Debug for CompilationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("CompilationCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
