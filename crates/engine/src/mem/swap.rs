//! Swap space.
//!
//! Secondary store for the contents of evicted pages, keyed by
//! (process, page). A slot existing implies the page is not resident in RAM;
//! a slot is only removed when its page becomes resident again.

use std::collections::HashMap;

use tracing::debug;

use crate::mem::paging::PageKey;
use crate::process::ProcessId;

/// Evicted-page store sized at four times physical memory.
#[derive(Debug, Clone)]
pub struct SwapSpace {
    capacity_kb: u64,
    slots: HashMap<PageKey, String>,
    swapped_pages: u64,
}

impl SwapSpace {
    /// Creates a swap space of `4 * total_memory_kb` KiB.
    pub fn new(total_memory_kb: u64) -> Self {
        Self {
            capacity_kb: total_memory_kb * 4,
            slots: HashMap::new(),
            swapped_pages: 0,
        }
    }

    /// Stores an evicted page's (placeholder) content and counts it.
    ///
    /// Re-evicting a key that already holds a slot refreshes the slot without
    /// double counting.
    pub fn evict_in(&mut self, process: ProcessId, page: u64) {
        let payload = format!("page {process}:{page}");
        if self.slots.insert((process, page), payload).is_none() {
            self.swapped_pages += 1;
        }
        debug!(%process, page, "swapped out");
    }

    /// Removes a slot when its page becomes resident again.
    ///
    /// # Returns
    ///
    /// `false` when no slot exists: the page was never evicted, a normal
    /// "nothing to swap in" condition that callers answer with zero-fill.
    pub fn evict_out(&mut self, process: ProcessId, page: u64) -> bool {
        if self.slots.remove(&(process, page)).is_some() {
            self.swapped_pages -= 1;
            debug!(%process, page, "swapped in");
            true
        } else {
            false
        }
    }

    /// `true` when a slot exists for the key.
    pub fn contains(&self, process: ProcessId, page: u64) -> bool {
        self.slots.contains_key(&(process, page))
    }

    /// Pages currently held in swap.
    pub fn swapped_pages(&self) -> u64 {
        self.swapped_pages
    }

    /// Total capacity in KiB.
    pub fn capacity_kb(&self) -> u64 {
        self.capacity_kb
    }
}
