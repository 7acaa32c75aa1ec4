//! Common constants used throughout the simulator.

/// Bytes per kibibyte; all configured sizes are given in KiB.
pub const KIB: u64 = 1024;

/// Machine word width in bytes. One instruction occupies one word, and the
/// caches account capacity in words of this size.
pub const WORD_BYTES: u64 = 4;

/// Page size used by the CPU-side MMU translation path (4 KiB).
///
/// This is fixed by the architecture model and is deliberately independent of
/// the configurable page size used by the paging manager; the two translation
/// layers keep distinct frame pools and distinct statistics.
pub const MMU_PAGE_BYTES: u64 = 4096;

/// Number of future page references the Optimal policy may inspect.
pub const LOOKAHEAD_WINDOW: usize = 64;
