//! tinylru: a fixed-capacity, in-memory LRU cache.
//!
//! One policy, done properly: a hashed key index paired with a doubly-linked
//! recency chain gives O(1) amortized `get`/`insert`/`remove`/`evict`. Reads
//! promote (a `get` hit counts as a use), overwrites never evict, and a full
//! cache sheds exactly its least-recently-used entry per new key.
//!
//! ```
//! use tinylru::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get(&"a");      // "a" is now most recently used
//! cache.insert("c", 3); // evicts "b"
//!
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! ```
//!
//! The cache is a plain in-process component: no persistence, no TTL, no
//! byte accounting, no internal locking. See the [`lru`] module docs for the
//! data-structure layout and capacity semantics.

pub mod error;
pub mod lru;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use error::{ConfigError, InvariantError};
pub use lru::{Iter, LruCache, DEFAULT_CAPACITY};
