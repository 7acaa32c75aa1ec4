//! Snapshot and statistics types.
//!
//! Everything the engine exposes to a presentation layer lives here: the CPU
//! snapshot, per-cache statistics, the mode-tagged memory state, and the
//! aggregate memory statistics. All types are plain values with no back
//! references into the engine, safe to hold across steps, and
//! serde-serializable for embedders that want JSON.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cpu::registers::Register;
use crate::process::ProcessId;

/// Processor execution states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CpuState {
    /// No program bound, or the bound program has finished.
    Halted,
    /// A program is loaded and waiting for its first step.
    Ready,
    /// At least one instruction has executed since loading.
    Running,
}

/// Read-only view of the processor, polled by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuSnapshot {
    /// Copy of every register.
    pub registers: BTreeMap<Register, u16>,
    /// Execution state.
    pub state: CpuState,
    /// Instructions executed since construction or reset.
    pub cycles: u64,
    /// Name of the bound program, if any.
    pub program: Option<String>,
}

/// Hit/miss accounting for one cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct CacheStats {
    /// Total read attempts.
    pub accesses: u64,
    /// Reads that found their address resident.
    pub hits: u64,
    /// `hits / accesses` as a percentage; zero before the first access.
    pub hit_rate_percent: f64,
    /// Resident entries times the word size.
    pub used_bytes: u64,
}

/// Manager-specific memory snapshot, tagged by allocation mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryState {
    /// Paging-mode shape.
    Paging {
        /// Page size in bytes.
        page_bytes: u64,
        /// Currently resident pages.
        resident_pages: usize,
        /// Frames holding a resident page.
        occupied_frames: usize,
        /// Bytes of physical memory in use.
        used_bytes: u64,
        /// Processes that own a page table.
        processes: Vec<ProcessId>,
    },
    /// Segmentation-mode shape.
    Segmentation {
        /// Segments across all processes.
        active_segments: usize,
        /// Bytes of physical memory in use.
        used_bytes: u64,
        /// Processes that own segments.
        processes: Vec<ProcessId>,
    },
}

/// Aggregate memory-subsystem statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryStatistics {
    /// Memory accesses issued through the façade.
    pub accesses: u64,
    /// Page faults serviced.
    pub faults: u64,
    /// `faults / accesses` as a percentage; zero before the first access.
    pub fault_rate_percent: f64,
    /// Physical memory in use, KiB.
    pub used_kb: u64,
    /// Total physical memory, KiB.
    pub total_kb: u64,
    /// Pages currently held in swap.
    pub swapped_pages: u64,
}
