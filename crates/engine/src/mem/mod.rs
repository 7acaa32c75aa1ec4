//! Memory subsystem.
//!
//! The [`MemorySubsystem`] façade orchestrates the configured allocator and
//! the page-fault protocol. It provides:
//! 1. **RAM:** A flat physical memory model with occupancy tracking.
//! 2. **Allocators:** Paging (page tables, frames, resident index) or
//!    segmentation (base/limit, first-fit), selected at construction.
//! 3. **Fault handling:** Victim selection, eviction to swap, installation of
//!    the faulting page, and swap-in or zero-fill of its content.
//! 4. **Statistics:** Access and fault counters plus mode-tagged snapshots.

/// Paging manager: page tables, frame pool, and the resident-page index.
pub mod paging;

/// Victim-selection policies over the resident index.
pub mod policy;

/// Physical memory model.
pub mod ram;

/// Segmentation manager: base/limit segments, first-fit placement.
pub mod segmentation;

/// Evicted-page store.
pub mod swap;

pub use paging::{PageKey, PageTableEntry, PagingManager, ResidentSet};
pub use ram::MainMemory;
pub use segmentation::{Segment, SegmentationManager, SegmentKind};
pub use swap::SwapSpace;

use tracing::debug;

use crate::config::{AllocationMode, Config, ReplacementPolicy};
use crate::constants::KIB;
use crate::error::AccessError;
use crate::process::ProcessId;
use crate::stats::{MemoryState, MemoryStatistics};

/// Direction of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Load.
    Read,
    /// Store; sets the modified bit on the touched page.
    Write,
}

/// Outcome of an access issued through the façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The page or segment was resident; nothing else happened.
    Hit,
    /// A page fault was detected and the fault protocol ran.
    Fault,
    /// Segmentation rejected the address; no protocol exists to service it.
    Denied,
}

/// Mode-switched memory manager plus the fault protocol.
#[derive(Debug)]
pub struct MemorySubsystem {
    mode: AllocationMode,
    policy: ReplacementPolicy,
    ram: MainMemory,
    paging: PagingManager,
    segmentation: SegmentationManager,
    swap: SwapSpace,
    /// Future page references for Optimal, nearest first; refreshed by the
    /// driver before each access.
    lookahead: Vec<PageKey>,
    accesses: u64,
    faults: u64,
    total_kb: u64,
}

impl MemorySubsystem {
    /// Builds the subsystem from configuration; the mode and policy are fixed
    /// for the subsystem's lifetime.
    pub fn new(config: &Config) -> Self {
        Self {
            mode: config.memory.mode,
            policy: config.policy,
            ram: MainMemory::new(config.memory.total_kb),
            paging: PagingManager::new(config.memory.page_kb),
            segmentation: SegmentationManager::new(config.memory.total_kb),
            swap: SwapSpace::new(config.memory.total_kb),
            lookahead: Vec::new(),
            accesses: 0,
            faults: 0,
            total_kb: config.memory.total_kb,
        }
    }

    /// Allocates `size_kb` KiB to a process under the active mode.
    ///
    /// # Returns
    ///
    /// `false` only when segmentation finds no gap large enough; paging
    /// always succeeds.
    pub fn allocate(&mut self, process: ProcessId, size_kb: u64) -> bool {
        match self.mode {
            AllocationMode::Paging => {
                let _ = self.paging.allocate(process, size_kb);
                true
            }
            AllocationMode::Segmentation => self
                .segmentation
                .allocate(process, size_kb * KIB)
                .is_some(),
        }
    }

    /// Releases everything a process owns under the active mode. Unknown
    /// processes and repeated calls are no-ops.
    pub fn release(&mut self, process: ProcessId) {
        match self.mode {
            AllocationMode::Paging => self.paging.release(process),
            AllocationMode::Segmentation => self.segmentation.release(process),
        }
    }

    /// Issues one memory access.
    ///
    /// Counts the access, delegates to the active manager, and on a paging
    /// miss counts a fault and runs the fault protocol: select a victim,
    /// evict it to swap, install the faulting page in the victim's frame, and
    /// swap its prior content back in, zero-filling the frame when the page
    /// was never evicted before. A missing page table is handled the same
    /// way; the replacement installs a fresh table for the process.
    pub fn access(&mut self, address: u64, process: ProcessId, kind: AccessKind) -> AccessOutcome {
        self.accesses += 1;

        match self.mode {
            AllocationMode::Paging => match self.paging.access(address, process, kind) {
                Ok(()) => AccessOutcome::Hit,
                Err(AccessError::NotResident { .. } | AccessError::UnknownProcess(_)) => {
                    self.faults += 1;
                    self.handle_fault(address, process);
                    AccessOutcome::Fault
                }
                Err(AccessError::SegmentViolation { .. }) => AccessOutcome::Denied,
            },
            AllocationMode::Segmentation => {
                match self.segmentation.access(address, process, kind) {
                    Ok(()) => AccessOutcome::Hit,
                    Err(_) => AccessOutcome::Denied,
                }
            }
        }
    }

    /// Supplies the bounded window of future page references the Optimal
    /// policy consults. Stale windows merely degrade Optimal toward FIFO.
    pub fn set_lookahead(&mut self, references: Vec<PageKey>) {
        self.lookahead = references;
    }

    /// Manager-specific snapshot, tagged by mode.
    pub fn memory_state(&self) -> MemoryState {
        match self.mode {
            AllocationMode::Paging => self.paging.state(),
            AllocationMode::Segmentation => self.segmentation.state(),
        }
    }

    /// Aggregate statistics for the presentation layer.
    pub fn statistics(&self) -> MemoryStatistics {
        let fault_rate_percent = if self.accesses == 0 {
            0.0
        } else {
            self.faults as f64 / self.accesses as f64 * 100.0
        };
        let used_bytes = match self.mode {
            AllocationMode::Paging => self.paging.used_bytes(),
            AllocationMode::Segmentation => self.segmentation.used_bytes(),
        };
        MemoryStatistics {
            accesses: self.accesses,
            faults: self.faults,
            fault_rate_percent,
            used_kb: used_bytes / KIB,
            total_kb: self.total_kb,
            swapped_pages: self.swap.swapped_pages(),
        }
    }

    /// The paging manager (read-only).
    pub fn paging(&self) -> &PagingManager {
        &self.paging
    }

    /// The segmentation manager (read-only).
    pub fn segmentation(&self) -> &SegmentationManager {
        &self.segmentation
    }

    /// The swap space (read-only).
    pub fn swap(&self) -> &SwapSpace {
        &self.swap
    }

    /// Physical memory (read-only).
    pub fn ram(&self) -> &MainMemory {
        &self.ram
    }

    fn handle_fault(&mut self, address: u64, process: ProcessId) {
        let victim = policy::select_victim(self.policy, self.paging.resident(), &self.lookahead);
        let Some(victim) = victim else {
            debug!(%process, address, "fault with no victim available; skipping replacement");
            return;
        };

        self.swap.evict_in(victim.0, victim.1);

        let page_bytes = self.paging.page_bytes();
        let new_page = address / page_bytes;
        let frame = self.paging.replace(victim, address, process);

        if !self.swap.evict_out(process, new_page) {
            // First touch of this page: nothing to swap in, zero-fill the frame.
            if let Some(frame) = frame {
                self.ram.zero_range(frame * page_bytes, page_bytes);
            }
        }
    }
}
