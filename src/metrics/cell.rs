use std::cell::Cell;

/// A metrics-only counter bumped from `&self` read paths.
///
/// # Safety
/// Only sound while all access to the owning cache is externally
/// serialized, which is the cache's documented usage contract. Counters are
/// observational and never affect correctness.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}

// SAFETY: access is externally serialized per the cache's single-threaded
// contract; the cell is never reached from two threads at once.
unsafe impl Sync for MetricsCell {}
unsafe impl Send for MetricsCell {}
