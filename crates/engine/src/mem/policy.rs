//! Page-replacement victim selection.
//!
//! Pure selection functions over the resident index; nothing here mutates
//! engine state. The three policies are distinct and exact:
//!
//! - `Fifo`: earliest-inserted resident key, untouched by recency promotions.
//! - `Lru`: least-recently-used key; the resident index is promoted on every
//!   access, so its front is the true LRU.
//! - `Optimal` (Belady): the key whose next use lies farthest in the supplied
//!   lookahead window; keys never referenced again win, oldest first.
//!
//! An empty resident set yields `None`; "no victim available" is a defined
//! no-op for the caller, not an error.

use crate::config::ReplacementPolicy;
use crate::mem::paging::{PageKey, ResidentSet};

/// Selects a victim from the resident set under the given policy.
///
/// # Arguments
///
/// * `policy` - Victim-selection algorithm.
/// * `resident` - The resident-page index to choose from.
/// * `lookahead` - Future page references, nearest first; consulted only by
///   `Optimal`, where an empty window degrades to FIFO order.
pub fn select_victim(
    policy: ReplacementPolicy,
    resident: &ResidentSet,
    lookahead: &[PageKey],
) -> Option<PageKey> {
    match policy {
        ReplacementPolicy::Fifo => resident.oldest_inserted(),
        ReplacementPolicy::Lru => resident.least_recent(),
        ReplacementPolicy::Optimal => select_optimal(resident, lookahead),
    }
}

/// Belady's algorithm over a bounded window.
///
/// Ranks every resident key by the position of its next use in `lookahead`;
/// a key with no future use ranks past the end of the window and ties are
/// broken toward the earliest-inserted key.
fn select_optimal(resident: &ResidentSet, lookahead: &[PageKey]) -> Option<PageKey> {
    resident
        .iter()
        .copied()
        .max_by_key(|key| {
            let next_use = lookahead
                .iter()
                .position(|reference| reference == key)
                .unwrap_or(usize::MAX);
            // Farthest next use wins; among never-used keys, oldest insertion.
            let age = u64::MAX - resident.inserted_sequence(*key).unwrap_or(0);
            (next_use, age)
        })
}
