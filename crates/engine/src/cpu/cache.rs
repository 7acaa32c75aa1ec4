//! Fixed-capacity associative cache.
//!
//! A deliberately simple model, uniform across L1 and L2: an address→word map
//! bounded by `size / word` entries, evicting the oldest-inserted entry when
//! full. The only policy is FIFO; the richer policy machinery in
//! [`crate::mem::policy`] belongs to page replacement, not to the caches.

use std::collections::{HashMap, VecDeque};

use crate::constants::{KIB, WORD_BYTES};
use crate::stats::CacheStats;

/// Insertion-ordered address→word store with hit/miss accounting.
#[derive(Debug, Clone)]
pub struct Cache {
    capacity: usize,
    /// Insertion order; front is the next eviction victim.
    order: VecDeque<u64>,
    lines: HashMap<u64, u32>,
    accesses: u64,
    hits: u64,
}

impl Cache {
    /// Creates a cache of `size_kb` KiB holding `size_kb * 1024 / 4` words.
    pub fn new(size_kb: u64) -> Self {
        let capacity = (size_kb * KIB / WORD_BYTES) as usize;
        Self {
            capacity,
            order: VecDeque::new(),
            lines: HashMap::new(),
            accesses: 0,
            hits: 0,
        }
    }

    /// Looks up an address, counting the access and any hit.
    pub fn read(&mut self, address: u64) -> Option<u32> {
        self.accesses += 1;
        let value = self.lines.get(&address).copied();
        if value.is_some() {
            self.hits += 1;
        }
        value
    }

    /// Inserts or updates an entry, evicting the oldest-inserted entry first
    /// when at capacity. Updating an existing address keeps its age.
    pub fn write(&mut self, address: u64, value: u32) {
        if self.lines.contains_key(&address) {
            if let Some(line) = self.lines.get_mut(&address) {
                *line = value;
            }
            return;
        }
        if self.lines.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                let _ = self.lines.remove(&oldest);
            }
        }
        let _ = self.lines.insert(address, value);
        self.order.push_back(address);
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accumulated access statistics.
    pub fn stats(&self) -> CacheStats {
        let hit_rate_percent = if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64 * 100.0
        };
        CacheStats {
            accesses: self.accesses,
            hits: self.hits,
            hit_rate_percent,
            used_bytes: self.lines.len() as u64 * WORD_BYTES,
        }
    }
}
