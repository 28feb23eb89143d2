//! Operation counters for the cache, behind the `metrics` cargo feature.
//!
//! Recording and consumption are split: [`LruMetrics`] is the live counter
//! block owned by the cache and bumped inline by its operations;
//! [`LruMetricsSnapshot`] is the `Copy` view handed out to callers, with
//! len/capacity gauges captured at snapshot time. Mutating operations bump
//! plain `u64` fields through `&mut self`; the read-only `peek` path goes
//! through a [`MetricsCell`] so `&self` methods can still count.

mod cell;

pub use cell::MetricsCell;

/// Live counters owned by a cache instance.
#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
    pub clear_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl LruMetrics {
    pub fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    pub fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    pub fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    pub fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    pub fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    pub fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    pub fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    pub fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    pub fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }

    pub fn record_clear(&mut self) {
        self.clear_calls += 1;
    }

    pub fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    pub fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    /// Captures the counters plus the gauges supplied by the cache.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            touch_calls: self.touch_calls,
            touch_found: self.touch_found,
            clear_calls: self.clear_calls,
            peek_calls: self.peek_calls.get(),
            peek_found: self.peek_found.get(),
            cache_len,
            capacity,
        }
    }
}

/// Point-in-time view of a cache's counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub touch_calls: u64,
    pub touch_found: u64,
    pub clear_calls: u64,
    pub peek_calls: u64,
    pub peek_found: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}
