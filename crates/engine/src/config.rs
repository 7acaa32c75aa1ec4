//! Configuration system for the simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the engine. It provides:
//! 1. **Defaults:** Baseline sizes for RAM, caches, and pages.
//! 2. **Structures:** Hierarchical config for memory and the cache pair.
//! 3. **Enums:** Allocation mode and page-replacement policy selection.
//!
//! Configuration is supplied as JSON (see `serde_json`) or via
//! `Config::default()`. It is consumed at construction and immutable
//! thereafter; changing it requires building a fresh `Simulation`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Total physical memory (1 MiB).
    pub const MEMORY_KB: u64 = 1024;

    /// L1 cache size (64 KiB).
    pub const L1_KB: u64 = 64;

    /// L2 cache size (256 KiB).
    pub const L2_KB: u64 = 256;

    /// Page size for the paging manager (4 KiB).
    pub const PAGE_KB: u64 = 4;
}

/// Page-replacement victim-selection algorithms.
///
/// Selects which resident page is evicted when a page fault occurs and
/// physical memory is fully committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// First In First Out: evicts the earliest-allocated still-resident page.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Recently Used: evicts the page untouched for the longest time.
    ///
    /// The resident index is promoted on every access, so selection is exact
    /// recency, not an approximation.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Optimal (Belady): evicts the page whose next use lies farthest in a
    /// bounded lookahead window of future references, preferring pages that
    /// are never referenced again.
    #[serde(alias = "Optimal")]
    Optimal,
}

/// Memory allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Fixed-size pages mapped to physical frames; faults trigger replacement.
    #[default]
    Paging,
    /// Variable-size base/limit segments placed first-fit; no fault protocol.
    Segmentation,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use memsim_core::config::{Config, ReplacementPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.memory.total_kb, 1024);
/// assert_eq!(config.policy, ReplacementPolicy::Lru);
///
/// let json = r#"{
///     "memory": { "total_kb": 2048, "page_kb": 4, "mode": "paging" },
///     "cache": { "l1_kb": 32, "l2_kb": 128 },
///     "policy": "FIFO"
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.memory.total_kb, 2048);
/// assert_eq!(config.policy, ReplacementPolicy::Fifo);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Physical memory and allocation-mode settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// L1/L2 cache sizes.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Page-replacement policy used by the fault protocol.
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

/// Physical memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Total physical memory in KiB.
    #[serde(default = "MemoryConfig::default_total_kb")]
    pub total_kb: u64,

    /// Page size in KiB (paging mode).
    #[serde(default = "MemoryConfig::default_page_kb")]
    pub page_kb: u64,

    /// Allocation strategy: paging or segmentation.
    #[serde(default)]
    pub mode: AllocationMode,
}

impl MemoryConfig {
    fn default_total_kb() -> u64 {
        defaults::MEMORY_KB
    }

    fn default_page_kb() -> u64 {
        defaults::PAGE_KB
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            total_kb: defaults::MEMORY_KB,
            page_kb: defaults::PAGE_KB,
            mode: AllocationMode::default(),
        }
    }
}

/// Cache pair configuration.
///
/// Both levels use the same simple organization: fully associative by address,
/// FIFO eviction, 4-byte words. Only the sizes differ.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// L1 cache size in KiB.
    #[serde(default = "CacheConfig::default_l1_kb")]
    pub l1_kb: u64,

    /// L2 cache size in KiB.
    #[serde(default = "CacheConfig::default_l2_kb")]
    pub l2_kb: u64,
}

impl CacheConfig {
    fn default_l1_kb() -> u64 {
        defaults::L1_KB
    }

    fn default_l2_kb() -> u64 {
        defaults::L2_KB
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            l1_kb: defaults::L1_KB,
            l2_kb: defaults::L2_KB,
        }
    }
}
