//! Convenience re-exports of the public surface.

pub use crate::error::{ConfigError, InvariantError};
pub use crate::lru::{Iter, LruCache, DEFAULT_CAPACITY};

#[cfg(feature = "metrics")]
pub use crate::metrics::LruMetricsSnapshot;
