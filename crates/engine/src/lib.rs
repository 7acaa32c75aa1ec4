//! Didactic microprocessor and memory-management simulator.
//!
//! This crate implements the simulation engine behind `memsim`: a teaching model
//! of a fetch-execute CPU and its memory subsystem. It provides:
//! 1. **CPU:** Register file, instruction decode/execute, L1/L2 caches, and an MMU.
//! 2. **Memory:** Physical RAM, per-process page tables, segmentation, and swap.
//! 3. **Replacement:** FIFO, LRU, and Optimal victim selection over the resident set.
//! 4. **Simulation:** A session object that owns all state and advances one
//!    instruction per step under external drive.
//!
//! The engine holds no threads, performs no I/O, and never prints; embedders poll
//! snapshot types (serde-serializable) for display.

/// Common constants shared across the engine.
pub mod constants;

/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;

/// CPU core (register file, caches, MMU, execution).
pub mod cpu;

/// Non-fatal access signal types.
pub mod error;

/// Instruction encoding, decoding, and demo-program generation.
pub mod isa;

/// Memory subsystem (RAM, paging, segmentation, swap, replacement policies).
pub mod mem;

/// Simulated processes and their lifecycle states.
pub mod process;

/// Simulation session: construct, step, reset.
pub mod sim;

/// Snapshot and statistics types polled by embedders.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds the register file, caches, and MMU.
pub use crate::cpu::Processor;
/// Memory façade; orchestrates paging or segmentation plus the fault protocol.
pub use crate::mem::MemorySubsystem;
/// Top-level session; construct with `Simulation::new`.
pub use crate::sim::Simulation;
