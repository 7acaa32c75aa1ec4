//! Physical memory model.
//!
//! A flat byte array plus a per-KiB occupancy map. Accesses are
//! bounds-checked and out-of-range accesses are ignored (read returns
//! `None`, write reports `false`); physical memory has no fault protocol of
//! its own.

use serde::Serialize;

use crate::constants::KIB;

/// Occupancy of one KiB block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockState {
    /// Never written since construction or the last zeroing.
    Free,
    /// At least one byte written.
    Occupied,
}

/// Flat RAM with per-block occupancy tracking.
#[derive(Debug, Clone)]
pub struct MainMemory {
    data: Vec<u8>,
    blocks: Vec<BlockState>,
}

impl MainMemory {
    /// Creates `total_kb` KiB of zeroed, free memory.
    pub fn new(total_kb: u64) -> Self {
        let size = (total_kb * KIB) as usize;
        Self {
            data: vec![0; size],
            blocks: vec![BlockState::Free; total_kb as usize],
        }
    }

    /// Writes one byte; marks the containing block occupied.
    ///
    /// # Returns
    ///
    /// `false` when the address is out of range.
    pub fn write(&mut self, address: u64, value: u8) -> bool {
        let Some(slot) = self.data.get_mut(address as usize) else {
            return false;
        };
        *slot = value;
        let block = (address / KIB) as usize;
        if let Some(state) = self.blocks.get_mut(block) {
            *state = BlockState::Occupied;
        }
        true
    }

    /// Reads one byte, or `None` when out of range.
    pub fn read(&self, address: u64) -> Option<u8> {
        self.data.get(address as usize).copied()
    }

    /// Zeroes `[start, start + len)`, clamped to the memory size, and marks
    /// the touched blocks occupied. Used to model zero-fill of a frame whose
    /// page has never been swapped out.
    pub fn zero_range(&mut self, start: u64, len: u64) {
        let size = self.data.len() as u64;
        let start = start.min(size);
        let end = start.saturating_add(len).min(size);
        if start >= end {
            return;
        }
        for byte in &mut self.data[start as usize..end as usize] {
            *byte = 0;
        }
        let first_block = (start / KIB) as usize;
        let last_block = (end.saturating_sub(1) / KIB) as usize;
        for block in first_block..=last_block {
            if let Some(state) = self.blocks.get_mut(block) {
                *state = BlockState::Occupied;
            }
        }
    }

    /// Memory size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    /// Per-KiB occupancy map.
    pub fn blocks(&self) -> &[BlockState] {
        &self.blocks
    }
}
