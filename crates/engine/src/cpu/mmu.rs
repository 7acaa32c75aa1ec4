//! CPU-side address translation unit.
//!
//! A simplified logical→physical translation layer used directly by the CPU's
//! address generation: the first touch of a page allocates the next
//! process-scoped frame and memoizes it. This path keeps its own frame pool,
//! independent of the paging manager's, so the two layers' statistics stay
//! distinct.

use std::collections::HashMap;

use crate::constants::MMU_PAGE_BYTES;
use crate::process::ProcessId;

/// Per-process page→frame memo plus a translation counter.
#[derive(Debug, Clone, Default)]
pub struct Mmu {
    tables: HashMap<ProcessId, HashMap<u64, u64>>,
    translations: u64,
}

impl Mmu {
    /// Creates an MMU with no mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a logical address for a process.
    ///
    /// Splits the address into page number and offset at the fixed 4 KiB page
    /// size, allocating the next sequential frame the first time a page is
    /// seen for the process.
    ///
    /// # Returns
    ///
    /// The physical address `frame * 4096 + offset`.
    pub fn translate(&mut self, logical: u64, process: ProcessId) -> u64 {
        self.translations += 1;

        let page = logical / MMU_PAGE_BYTES;
        let offset = logical % MMU_PAGE_BYTES;

        let table = self.tables.entry(process).or_default();
        let next_frame = table.len() as u64;
        let frame = *table.entry(page).or_insert(next_frame);

        frame * MMU_PAGE_BYTES + offset
    }

    /// Total translations performed.
    pub fn translations(&self) -> u64 {
        self.translations
    }
}
