//! Non-fatal access signals.
//!
//! Nothing in the engine is fatal. The variants here are normal outcomes of a
//! memory access that the caller is expected to handle: a non-resident page
//! feeds the fault protocol, a segment violation is reported and ignored, and
//! an unknown process is treated like a process with nothing resident.

use thiserror::Error;

use crate::process::ProcessId;

/// Reasons a memory access did not complete against resident state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The page exists in the process's table but is not resident, or the
    /// table has no entry for it. Drives the page-fault protocol.
    #[error("page {page} of process {process} is not resident")]
    NotResident {
        /// Owning process.
        process: ProcessId,
        /// Logical page number derived from the faulting address.
        page: u64,
    },

    /// The process has no page table or segment list at all.
    #[error("process {0} has no allocation")]
    UnknownProcess(ProcessId),

    /// The address falls outside every segment of the process.
    #[error("address {address:#x} is outside every segment of process {process}")]
    SegmentViolation {
        /// Accessing process.
        process: ProcessId,
        /// Offending logical address.
        address: u64,
    },
}
