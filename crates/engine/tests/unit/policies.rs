//! Replacement Policy Tests.
//!
//! Verifies victim selection for FIFO, LRU, and Optimal over a handcrafted
//! resident index. Each policy is a pure function; these tests exercise them
//! in isolation with edge cases.

use memsim_core::config::ReplacementPolicy;
use memsim_core::mem::paging::ResidentSet;
use memsim_core::mem::policy::select_victim;
use memsim_core::process::ProcessId;
use pretty_assertions::assert_eq;

const P1: ProcessId = ProcessId(1);

fn resident_with_pages(pages: &[u64]) -> ResidentSet {
    let mut resident = ResidentSet::default();
    for (frame, page) in pages.iter().enumerate() {
        resident.insert((P1, *page), frame as u64);
    }
    resident
}

// ── FIFO ───────────────────────────────────────────────────────────

#[test]
fn fifo_selects_earliest_inserted() {
    let resident = resident_with_pages(&[0, 1, 2]);

    assert_eq!(
        select_victim(ReplacementPolicy::Fifo, &resident, &[]),
        Some((P1, 0))
    );
}

/// Recency promotions must not disturb FIFO order.
#[test]
fn fifo_ignores_promotions() {
    let mut resident = resident_with_pages(&[0, 1, 2]);
    assert!(resident.promote((P1, 0)));
    assert!(resident.promote((P1, 0)));

    assert_eq!(
        select_victim(ReplacementPolicy::Fifo, &resident, &[]),
        Some((P1, 0))
    );
}

#[test]
fn fifo_moves_on_after_eviction() {
    let mut resident = resident_with_pages(&[0, 1, 2]);
    let _ = resident.remove((P1, 0));

    assert_eq!(
        select_victim(ReplacementPolicy::Fifo, &resident, &[]),
        Some((P1, 1))
    );
}

// ── LRU ────────────────────────────────────────────────────────────

#[test]
fn lru_selects_least_recent_without_accesses() {
    let resident = resident_with_pages(&[0, 1, 2]);

    assert_eq!(
        select_victim(ReplacementPolicy::Lru, &resident, &[]),
        Some((P1, 0))
    );
}

/// Re-accessing the oldest page shifts the victim to the next-oldest.
#[test]
fn lru_follows_promotions() {
    let mut resident = resident_with_pages(&[0, 1, 2]);
    assert!(resident.promote((P1, 0)));

    assert_eq!(
        select_victim(ReplacementPolicy::Lru, &resident, &[]),
        Some((P1, 1))
    );

    assert!(resident.promote((P1, 1)));
    assert_eq!(
        select_victim(ReplacementPolicy::Lru, &resident, &[]),
        Some((P1, 2))
    );
}

#[test]
fn lru_repeated_access_keeps_victim_stable() {
    let mut resident = resident_with_pages(&[0, 1, 2]);
    assert!(resident.promote((P1, 2)));
    assert!(resident.promote((P1, 2)));

    assert_eq!(
        select_victim(ReplacementPolicy::Lru, &resident, &[]),
        Some((P1, 0))
    );
}

// ── Optimal ────────────────────────────────────────────────────────

/// The page used farthest in the future is evicted.
#[test]
fn optimal_selects_farthest_next_use() {
    let resident = resident_with_pages(&[0, 1, 2]);
    let lookahead = vec![(P1, 0), (P1, 1), (P1, 0), (P1, 2)];

    assert_eq!(
        select_victim(ReplacementPolicy::Optimal, &resident, &lookahead),
        Some((P1, 2))
    );
}

/// A page never referenced again beats every page with a future use.
#[test]
fn optimal_prefers_never_used() {
    let resident = resident_with_pages(&[0, 1, 2]);
    let lookahead = vec![(P1, 0), (P1, 2), (P1, 0)];

    assert_eq!(
        select_victim(ReplacementPolicy::Optimal, &resident, &lookahead),
        Some((P1, 1))
    );
}

/// Among several never-used pages, the earliest-inserted goes first.
#[test]
fn optimal_breaks_never_used_ties_by_age() {
    let resident = resident_with_pages(&[0, 1, 2]);
    let lookahead = vec![(P1, 2)];

    assert_eq!(
        select_victim(ReplacementPolicy::Optimal, &resident, &lookahead),
        Some((P1, 0))
    );
}

/// With no lookahead at all, Optimal degrades to FIFO order.
#[test]
fn optimal_with_empty_window_degrades_to_fifo() {
    let resident = resident_with_pages(&[0, 1, 2]);

    assert_eq!(
        select_victim(ReplacementPolicy::Optimal, &resident, &[]),
        Some((P1, 0))
    );
}

// ── Shared edge cases ──────────────────────────────────────────────

/// An empty resident set yields "no victim available" for every policy.
#[test]
fn empty_resident_set_yields_none() {
    let resident = ResidentSet::default();

    for policy in [
        ReplacementPolicy::Fifo,
        ReplacementPolicy::Lru,
        ReplacementPolicy::Optimal,
    ] {
        assert_eq!(select_victim(policy, &resident, &[]), None);
    }
}
