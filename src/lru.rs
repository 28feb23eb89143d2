//! Fixed-capacity LRU cache: hash index + doubly-linked recency chain.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────┐
//!   │                      LruCache<K, V>                       │
//!   │                                                           │
//!   │   FxHashMap<K, NonNull<Node>>     recency chain           │
//!   │   ┌───────┬────────┐                                      │
//!   │   │  key  │  node  │   head ─► [A] ◄─► [B] ◄─► [C] ◄─ tail│
//!   │   └───────┴────────┘   (MRU)                      (LRU)   │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The map resolves a key to its node in O(1); the chain orders live nodes
//! from most- to least-recently-used. Every access path funnels through one
//! internal promote routine (detach + attach at head), so `get`, `insert`
//! and `touch` share a single auditable reordering code path.
//!
//! ## Operations
//!
//! | Method              | Complexity | Reorders chain | Description                     |
//! |---------------------|------------|----------------|---------------------------------|
//! | `insert(k, v)`      | O(1)*      | yes            | Upsert, evicts tail when full   |
//! | `get(&k)`           | O(1)       | yes            | Lookup, promotes entry to MRU   |
//! | `peek(&k)`          | O(1)       | no             | Lookup without promotion        |
//! | `contains(&k)`      | O(1)       | no             | Presence check                  |
//! | `remove(&k)`        | O(1)       | n/a            | Detach and return the value     |
//! | `evict()`           | O(1)       | n/a            | Remove the LRU entry            |
//! | `touch(&k)`         | O(1)       | yes            | Promote without reading         |
//! | `peek_lru()`        | O(1)       | no             | Observe the eviction candidate  |
//! | `clear()`           | O(n)       | n/a            | Drop all entries                |
//!
//! \* amortized; a full cache pays one eviction per new key.
//!
//! ## Capacity semantics
//!
//! Capacity counts entries, not bytes, is fixed at construction and must be
//! positive ([`LruCache::try_new`] rejects zero). Overwriting an existing key
//! never evicts: size does not grow on overwrite. A new key on a full cache
//! evicts exactly the current tail, so `len() <= capacity()` holds after
//! every completed operation.
//!
//! ## Thread safety
//!
//! `LruCache` is single-threaded: every operation that reorders the chain
//! takes `&mut self`, including `get`. Sharing one instance across threads
//! requires external serialization (e.g. a mutex around the whole cache);
//! there is no internal locking.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ptr::NonNull;

use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{LruMetrics, LruMetricsSnapshot};

/// Capacity used by [`LruCache::default`] and [`Default::default`].
pub const DEFAULT_CAPACITY: usize = 1000;

/// Node in the recency chain.
///
/// `prev` points toward the MRU end, `next` toward the LRU end. The key is
/// duplicated here so eviction can remove the map entry without a reverse
/// index.
struct Node<K, V> {
    prev: Option<NonNull<Node<K, V>>>,
    next: Option<NonNull<Node<K, V>>>,
    key: K,
    value: V,
}

/// Fixed-capacity cache evicting the least-recently-used entry.
///
/// Reads through [`get`](LruCache::get) count as uses: a hit promotes the
/// entry to the most-recently-used position, exactly as a fresh
/// [`insert`](LruCache::insert) of the same key would. Use
/// [`peek`](LruCache::peek) for reads that must not disturb eviction order.
///
/// # Example
///
/// ```
/// use tinylru::LruCache;
///
/// let mut cache: LruCache<&str, u32> = LruCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
///
/// // Reading "a" shields it from the next eviction.
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// cache.insert("c", 3); // evicts "b", the least recently used
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    map: FxHashMap<K, NonNull<Node<K, V>>>,
    head: Option<NonNull<Node<K, V>>>,
    tail: Option<NonNull<Node<K, V>>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

// SAFETY: the raw node pointers only reference heap memory owned by this
// struct, so ownership transfers between threads are sound when K and V
// allow it.
unsafe impl<K, V> Send for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
}

// SAFETY: all shared-reference methods are read-only with respect to the
// chain and map. The caller must still serialize access externally; the
// cache performs no internal locking.
unsafe impl<K, V> Sync for LruCache<K, V>
where
    K: Eq + Hash + Clone + Sync,
    V: Sync,
{
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) to handle
    /// the error instead.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let cache: LruCache<u64, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible constructor for caller-supplied capacities.
    ///
    /// Rejects a zero capacity rather than silently accepting it: a cache
    /// that can hold nothing is a configuration mistake, not a useful
    /// degenerate case.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// assert!(LruCache::<u64, u64>::try_new(8).is_ok());
    /// assert!(LruCache::<u64, u64>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(LruCache {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// Detach a node from the chain without touching the map.
    ///
    /// Correct for interior, head, tail and sole-entry nodes alike.
    #[inline(always)]
    fn detach(&mut self, node_ptr: NonNull<Node<K, V>>) {
        unsafe {
            let node = node_ptr.as_ref();
            let prev = node.prev;
            let next = node.next;

            match prev {
                Some(mut p) => p.as_mut().next = next,
                None => self.head = next,
            }

            match next {
                Some(mut n) => n.as_mut().prev = prev,
                None => self.tail = prev,
            }
        }
    }

    /// Attach a node at the head (MRU position).
    #[inline(always)]
    fn attach_front(&mut self, mut node_ptr: NonNull<Node<K, V>>) {
        unsafe {
            let node = node_ptr.as_mut();
            node.prev = None;
            node.next = self.head;

            match self.head {
                Some(mut h) => h.as_mut().prev = Some(node_ptr),
                None => self.tail = Some(node_ptr),
            }

            self.head = Some(node_ptr);
        }
    }

    /// Shared touch path: reposition an already-linked node at the head.
    ///
    /// `get`, `insert` on an existing key, and `touch` all go through here.
    #[inline(always)]
    fn promote(&mut self, node_ptr: NonNull<Node<K, V>>) {
        self.detach(node_ptr);
        self.attach_front(node_ptr);
    }

    /// Unlink and take ownership of the tail node, if any.
    #[inline(always)]
    fn pop_tail(&mut self) -> Option<Box<Node<K, V>>> {
        self.tail.map(|tail_ptr| unsafe {
            let node = Box::from_raw(tail_ptr.as_ptr());

            self.tail = node.prev;
            match self.tail {
                Some(mut t) => t.as_mut().next = None,
                None => self.head = None,
            }

            node
        })
    }

    #[inline]
    fn validate(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// An existing key has its value replaced in place and its entry
    /// promoted; size does not change and nothing is evicted. A new key on a
    /// full cache first evicts the current tail, so at most one entry is
    /// evicted per call and the capacity bound holds on return.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// assert_eq!(cache.insert(1, "first"), None);
    /// assert_eq!(cache.insert(1, "second"), Some("first"));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&node_ptr) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = unsafe {
                let node = &mut *node_ptr.as_ptr();
                std::mem::replace(&mut node.value, value)
            };
            self.promote(node_ptr);

            self.validate();
            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        // Evict before allocating so the bound never slips, even transiently.
        if self.map.len() >= self.capacity {
            self.evict();
        }

        let node = Box::new(Node {
            prev: None,
            next: None,
            key: key.clone(),
            value,
        });
        let node_ptr = NonNull::from(Box::leak(node));

        self.map.insert(key, node_ptr);
        self.attach_front(node_ptr);

        self.validate();
        None
    }

    /// Looks up a value and promotes its entry to the MRU position.
    ///
    /// A hit counts as a use: afterwards the entry is the last candidate for
    /// eviction, exactly as if it had just been inserted with its current
    /// value. A miss returns `None` and changes nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "value");
    ///
    /// assert_eq!(cache.get(&1), Some(&"value"));
    /// assert_eq!(cache.get(&99), None);
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let node_ptr = match self.map.get(key) {
            Some(&ptr) => ptr,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.promote(node_ptr);
        self.validate();

        unsafe { Some(&(*node_ptr.as_ptr()).value) }
    }

    /// Looks up a value without promoting it.
    ///
    /// Unlike [`get`](Self::get), the recency chain is left untouched, so a
    /// peeked entry remains as close to eviction as it was.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    ///
    /// // Key 1 is still the eviction candidate.
    /// cache.insert(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        self.map.get(key).map(|&node_ptr| {
            #[cfg(feature = "metrics")]
            self.metrics.record_peek_found();
            unsafe { &(*node_ptr.as_ptr()).value }
        })
    }

    /// Returns `true` if the key is present. Never reorders the chain.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "value");
    ///
    /// assert!(cache.contains(&1));
    /// assert!(!cache.contains(&2));
    /// ```
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Removes an entry, returning its value if the key was present.
    ///
    /// Former neighbors are relinked directly to each other; head and tail
    /// are adjusted if the removed entry was an endpoint. Removing an absent
    /// key returns `None` and leaves the cache unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "value");
    ///
    /// assert_eq!(cache.remove(&1), Some("value"));
    /// assert_eq!(cache.remove(&1), None);
    /// assert!(cache.is_empty());
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let node_ptr = self.map.remove(key)?;

        self.detach(node_ptr);
        let node = unsafe { Box::from_raw(node_ptr.as_ptr()) };

        self.validate();
        Some(node.value)
    }

    /// Removes and returns the least-recently-used entry.
    ///
    /// This is the eviction primitive [`insert`](Self::insert) uses when the
    /// cache is full; calling it directly forces one eviction. Deterministic:
    /// the chain is a strict total order by recency, so there is exactly one
    /// LRU entry. Returns `None` on an empty cache.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// assert_eq!(cache.evict(), Some((1, "first")));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn evict(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let node = self.pop_tail()?;
        self.map.remove(&node.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        self.validate();
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    /// Peeks at the eviction candidate without removing or promoting it.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// assert_eq!(cache.peek_lru(), Some((&1, &"first")));
    /// assert_eq!(cache.len(), 2);
    /// ```
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.tail.map(|tail_ptr| unsafe {
            let node = &*tail_ptr.as_ptr();
            (&node.key, &node.value)
        })
    }

    /// Marks an entry as recently used without reading its value.
    ///
    /// Returns `true` if the key was found and promoted.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    ///
    /// assert!(cache.touch(&1));
    /// cache.insert(3, "third"); // evicts 2, not the touched 1
    /// assert!(cache.contains(&1));
    /// assert!(!cache.touch(&99));
    /// ```
    pub fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        match self.map.get(key) {
            Some(&node_ptr) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_touch_found();

                self.promote(node_ptr);
                self.validate();
                true
            },
            None => false,
        }
    }

    /// Current number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        while self.pop_tail().is_some() {}
        self.map.clear();

        self.validate();
    }

    /// Iterates entries from most- to least-recently-used.
    ///
    /// # Example
    ///
    /// ```
    /// use tinylru::LruCache;
    ///
    /// let mut cache = LruCache::new(10);
    /// cache.insert(1, "a");
    /// cache.insert(2, "b");
    /// cache.get(&1); // promote
    ///
    /// let keys: Vec<u32> = cache.iter().map(|(&k, _)| k).collect();
    /// assert_eq!(keys, vec![1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head,
            remaining: self.map.len(),
            marker: PhantomData,
        }
    }

    /// Verifies the structural invariants of the map and recency chain.
    ///
    /// Walks the chain from head to tail checking that back-links mirror
    /// forward links, that every node is indexed by the map under its own
    /// key, that the walk covers exactly `len()` nodes without cycling, and
    /// that the endpoints agree with `head`/`tail`. O(n); intended for tests
    /// and debug assertions, and run automatically after every mutation in
    /// debug builds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.is_empty() {
            if self.head.is_some() || self.tail.is_some() {
                return Err(InvariantError::new("empty cache has chain endpoints"));
            }
            return Ok(());
        }

        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            return Err(InvariantError::new("non-empty cache missing head or tail"));
        };
        unsafe {
            if head.as_ref().prev.is_some() {
                return Err(InvariantError::new("head has a predecessor"));
            }
            if tail.as_ref().next.is_some() {
                return Err(InvariantError::new("tail has a successor"));
            }
        }

        let mut count = 0usize;
        let mut last: Option<NonNull<Node<K, V>>> = None;
        let mut current = self.head;
        while let Some(ptr) = current {
            count += 1;
            if count > self.map.len() {
                return Err(InvariantError::new("cycle detected in recency chain"));
            }
            let node = unsafe { ptr.as_ref() };
            match self.map.get(&node.key) {
                Some(&mapped) if mapped == ptr => {},
                _ => return Err(InvariantError::new("chain node not indexed by its key")),
            }
            if node.prev != last {
                return Err(InvariantError::new("back-link does not mirror forward link"));
            }
            last = Some(ptr);
            current = node.next;
        }

        if count != self.map.len() {
            return Err(InvariantError::new("chain length differs from map length"));
        }
        if last != Some(tail) {
            return Err(InvariantError::new("chain does not terminate at tail"));
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Captures the operation counters plus current len/capacity gauges.
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        self.metrics.snapshot(self.map.len(), self.capacity)
    }
}

// Free all heap-allocated nodes when the cache is dropped.
impl<K, V> Drop for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        while self.pop_tail().is_some() {}
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with [`DEFAULT_CAPACITY`] (1000) entries.
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over cache entries in recency order (MRU first).
///
/// Created by [`LruCache::iter`].
pub struct Iter<'a, K, V> {
    next: Option<NonNull<Node<K, V>>>,
    remaining: usize,
    marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let ptr = self.next?;
        let node: &'a Node<K, V> = unsafe { &*ptr.as_ptr() };
        self.next = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn new_with_various_capacities() {
            let cache1: LruCache<i32, i32> = LruCache::new(1);
            assert_eq!(cache1.capacity(), 1);
            assert_eq!(cache1.len(), 0);

            let cache2: LruCache<i32, i32> = LruCache::new(1000);
            assert_eq!(cache2.capacity(), 1000);
            assert_eq!(cache2.len(), 0);
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LruCache::<i32, i32>::try_new(0).unwrap_err();
            assert!(err.to_string().contains("capacity"));
        }

        #[test]
        #[should_panic(expected = "capacity")]
        fn new_panics_on_zero_capacity() {
            let _ = LruCache::<i32, i32>::new(0);
        }

        #[test]
        fn default_uses_documented_capacity() {
            let cache: LruCache<i32, i32> = LruCache::default();
            assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        }
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn insert_and_get_round_trip() {
            let mut cache = LruCache::new(5);

            assert_eq!(cache.insert(1, 100), None);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&1), Some(&100));
        }

        #[test]
        fn get_miss_returns_none() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);

            assert_eq!(cache.get(&2), None);
        }

        #[test]
        fn insert_duplicate_key_updates_in_place() {
            let mut cache = LruCache::new(5);

            assert_eq!(cache.insert(1, 100), None);
            assert_eq!(cache.insert(1, 200), Some(100));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&1), Some(&200));
        }

        #[test]
        fn contains_reports_presence() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);

            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn remove_existing_then_absent() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 100);

            assert_eq!(cache.remove(&1), Some(100));
            assert_eq!(cache.len(), 0);
            assert!(!cache.contains(&1));

            // Second removal is a miss and leaves state unchanged.
            assert_eq!(cache.remove(&1), None);
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn len_tracks_operations() {
            let mut cache = LruCache::new(3);
            assert_eq!(cache.len(), 0);

            cache.insert(1, 10);
            assert_eq!(cache.len(), 1);
            cache.insert(2, 20);
            assert_eq!(cache.len(), 2);
            cache.remove(&1);
            assert_eq!(cache.len(), 1);
            cache.clear();
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());
        }

        #[test]
        fn operations_on_empty_cache() {
            let mut cache: LruCache<i32, i32> = LruCache::new(5);

            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.peek(&1), None);
            assert!(!cache.contains(&1));
            assert_eq!(cache.remove(&1), None);
            assert_eq!(cache.evict(), None);
            assert_eq!(cache.peek_lru(), None);
            assert!(!cache.touch(&1));
            assert_eq!(cache.iter().count(), 0);
        }

        #[test]
        fn clear_removes_everything() {
            let mut cache = LruCache::new(5);
            for i in 1..=3 {
                cache.insert(i, i * 10);
            }

            cache.clear();
            assert!(cache.is_empty());
            for i in 1..=3 {
                assert!(!cache.contains(&i));
            }
            assert_eq!(cache.capacity(), 5);
        }

        #[test]
        fn string_keys_work() {
            let mut cache: LruCache<String, u32> = LruCache::new(2);
            cache.insert("alpha".to_string(), 1);
            cache.insert("beta".to_string(), 2);

            assert_eq!(cache.get(&"alpha".to_string()), Some(&1));
            cache.insert("gamma".to_string(), 3);
            assert!(!cache.contains(&"beta".to_string()));
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn capacity_one_evicts_on_every_new_key() {
            let mut cache = LruCache::new(1);

            cache.insert(1, 100);
            cache.insert(2, 200);
            assert_eq!(cache.len(), 1);
            assert!(!cache.contains(&1));
            assert!(cache.contains(&2));
        }

        #[test]
        fn eviction_follows_insertion_order_without_access() {
            let mut cache = LruCache::new(2);

            cache.insert('a', 1);
            cache.insert('b', 2);
            cache.insert('c', 3);

            assert!(!cache.contains(&'a'));
            assert!(cache.contains(&'b'));
            assert!(cache.contains(&'c'));
        }

        #[test]
        fn get_promotes_entry_out_of_eviction() {
            let mut cache = LruCache::new(2);

            cache.insert('a', 1);
            cache.insert('b', 2);
            cache.get(&'a');
            cache.insert('c', 3);

            // 'b' was least recently used once 'a' got promoted.
            assert!(cache.contains(&'a'));
            assert!(!cache.contains(&'b'));
            assert!(cache.contains(&'c'));
        }

        #[test]
        fn overwrite_never_evicts() {
            let mut cache = LruCache::new(1);

            cache.insert('a', 1);
            cache.insert('a', 2);

            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&'a'), Some(&2));
        }

        #[test]
        fn capacity_bound_holds_after_every_insert() {
            let mut cache = LruCache::new(7);
            for i in 0..100u32 {
                cache.insert(i, i);
                assert!(cache.len() <= cache.capacity());
            }
            assert_eq!(cache.len(), 7);
        }

        #[test]
        fn manual_evict_pops_the_tail() {
            let mut cache = LruCache::new(10);
            cache.insert(1, "first");
            cache.insert(2, "second");
            cache.insert(3, "third");

            assert_eq!(cache.evict(), Some((1, "first")));
            assert_eq!(cache.evict(), Some((2, "second")));
            assert_eq!(cache.evict(), Some((3, "third")));
            assert_eq!(cache.evict(), None);
        }

        #[test]
        fn peek_lru_matches_next_eviction() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 10);
            cache.insert(2, 20);
            cache.insert(3, 30);
            cache.touch(&1);

            assert_eq!(cache.peek_lru(), Some((&2, &20)));
            assert_eq!(cache.evict(), Some((2, 20)));
        }
    }

    mod recency_order {
        use super::*;

        fn keys_mru_to_lru(cache: &LruCache<u32, u32>) -> Vec<u32> {
            cache.iter().map(|(&k, _)| k).collect()
        }

        #[test]
        fn insertion_orders_newest_first() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);

            assert_eq!(keys_mru_to_lru(&cache), vec![3, 2, 1]);
        }

        #[test]
        fn get_moves_entry_to_front() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);
            cache.get(&1);

            assert_eq!(keys_mru_to_lru(&cache), vec![1, 3, 2]);
        }

        #[test]
        fn touching_head_is_a_no_op_for_order() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.touch(&2);
            cache.touch(&2);

            assert_eq!(keys_mru_to_lru(&cache), vec![2, 1]);
        }

        #[test]
        fn peek_and_contains_leave_order_alone() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);

            cache.peek(&1);
            assert!(cache.contains(&1));
            assert!(cache.contains(&1));

            assert_eq!(keys_mru_to_lru(&cache), vec![3, 2, 1]);
        }

        #[test]
        fn overwrite_promotes_like_access() {
            let mut cache = LruCache::new(3);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);
            cache.insert(1, 100);

            assert_eq!(keys_mru_to_lru(&cache), vec![1, 3, 2]);
        }

        #[test]
        fn remove_head_tail_and_interior_relink_correctly() {
            let mut cache = LruCache::new(5);
            for i in 1..=5 {
                cache.insert(i, i);
            }
            // chain: 5 4 3 2 1

            assert_eq!(cache.remove(&3), Some(3)); // interior
            assert_eq!(keys_mru_to_lru(&cache), vec![5, 4, 2, 1]);

            assert_eq!(cache.remove(&5), Some(5)); // head
            assert_eq!(keys_mru_to_lru(&cache), vec![4, 2, 1]);

            assert_eq!(cache.remove(&1), Some(1)); // tail
            assert_eq!(keys_mru_to_lru(&cache), vec![4, 2]);
        }

        #[test]
        fn removing_sole_entry_empties_both_endpoints() {
            let mut cache = LruCache::new(5);
            cache.insert(1, 1);

            assert_eq!(cache.remove(&1), Some(1));
            assert!(cache.is_empty());
            assert_eq!(cache.peek_lru(), None);
            cache.check_invariants().unwrap();

            // Chain endpoints reset; reinsertion starts a fresh chain.
            cache.insert(2, 2);
            assert_eq!(cache.peek_lru(), Some((&2, &2)));
        }
    }

    mod invariants {
        use super::*;

        #[test]
        fn chain_integrity_after_mixed_operations() {
            let mut cache = LruCache::new(8);

            for i in 0..32u32 {
                cache.insert(i, i);
                if i % 3 == 0 {
                    cache.get(&(i / 2));
                }
                if i % 5 == 0 {
                    cache.remove(&(i.saturating_sub(4)));
                }
                if i % 7 == 0 {
                    cache.evict();
                }
                cache.check_invariants().unwrap();
            }

            let visited: Vec<u32> = cache.iter().map(|(&k, _)| k).collect();
            assert_eq!(visited.len(), cache.len());
        }

        #[test]
        fn iter_visits_each_live_key_exactly_once() {
            let mut cache = LruCache::new(4);
            for i in 0..10u32 {
                cache.insert(i, i * 2);
            }

            let mut keys: Vec<u32> = cache.iter().map(|(&k, _)| k).collect();
            assert_eq!(keys.len(), cache.len());
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), cache.len());
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_track_hits_misses_and_evictions() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(1, 10); // update
            cache.insert(3, 3); // evicts
            cache.get(&3);
            cache.get(&99);
            cache.touch(&3);
            cache.peek(&3);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 4);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.touch_found, 1);
            assert_eq!(snap.peek_found, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }
    }
}
