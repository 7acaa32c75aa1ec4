//! Paging manager.
//!
//! Per-process page tables, the global frame pool, and the resident-page
//! index the replacement policies select victims from. A page-table entry
//! cycles `Absent → Present → Absent (evicted) → Present (reloaded)`
//! indefinitely.
//!
//! Invariants maintained here:
//! - a frame is owned by exactly one resident (process, page) key;
//! - `present` entries always have a resident-index entry and a frame
//!   mapping, non-present entries have neither;
//! - resident pages × page size equals the used-memory counter.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::constants::KIB;
use crate::error::AccessError;
use crate::mem::AccessKind;
use crate::process::ProcessId;
use crate::stats::MemoryState;

/// A (process, logical page) pair; the unit of residency and replacement.
pub type PageKey = (ProcessId, u64);

/// One entry of a process's page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    /// Owning frame while resident; stale once `present` is cleared.
    pub frame: u64,
    /// Residency flag.
    pub present: bool,
    /// Set on the first write access.
    pub modified: bool,
    /// Set on any access.
    pub referenced: bool,
}

/// Ordered index of resident pages.
///
/// Keys sit in recency order (front = least recently used, back = most
/// recently used) and additionally carry the insertion sequence number they
/// were allocated under, so FIFO can recover true insertion order after
/// promotions have reshuffled recency.
#[derive(Debug, Clone, Default)]
pub struct ResidentSet {
    order: VecDeque<PageKey>,
    entries: HashMap<PageKey, ResidentEntry>,
    next_sequence: u64,
}

#[derive(Debug, Clone, Copy)]
struct ResidentEntry {
    frame: u64,
    inserted: u64,
}

impl ResidentSet {
    /// Registers a key at the most-recently-used end with a fresh insertion
    /// sequence number. The key must not already be resident.
    pub fn insert(&mut self, key: PageKey, frame: u64) {
        let entry = ResidentEntry {
            frame,
            inserted: self.next_sequence,
        };
        self.next_sequence += 1;
        if self.entries.insert(key, entry).is_none() {
            self.order.push_back(key);
        }
    }

    /// Drops a key, returning its frame if it was resident.
    pub fn remove(&mut self, key: PageKey) -> Option<u64> {
        let entry = self.entries.remove(&key)?;
        if let Some(position) = self.order.iter().position(|candidate| *candidate == key) {
            let _ = self.order.remove(position);
        }
        Some(entry.frame)
    }

    /// Moves a key to the most-recently-used end; `false` if not resident.
    pub fn promote(&mut self, key: PageKey) -> bool {
        if !self.entries.contains_key(&key) {
            return false;
        }
        if let Some(position) = self.order.iter().position(|candidate| *candidate == key) {
            let _ = self.order.remove(position);
            self.order.push_back(key);
        }
        true
    }

    /// The least-recently-used key.
    pub fn least_recent(&self) -> Option<PageKey> {
        self.order.front().copied()
    }

    /// The earliest-inserted key, ignoring recency promotions.
    pub fn oldest_inserted(&self) -> Option<PageKey> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted)
            .map(|(key, _)| *key)
    }

    /// Insertion sequence number of a resident key.
    pub fn inserted_sequence(&self, key: PageKey) -> Option<u64> {
        self.entries.get(&key).map(|entry| entry.inserted)
    }

    /// Frame owned by a resident key.
    pub fn frame_of(&self, key: PageKey) -> Option<u64> {
        self.entries.get(&key).map(|entry| entry.frame)
    }

    /// Residency test.
    pub fn contains(&self, key: PageKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Keys in recency order, least recently used first.
    pub fn iter(&self) -> impl Iterator<Item = &PageKey> {
        self.order.iter()
    }

    /// Number of resident keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-process page tables plus the frame pool and resident index.
#[derive(Debug)]
pub struct PagingManager {
    page_kb: u64,
    tables: HashMap<ProcessId, HashMap<u64, PageTableEntry>>,
    /// Frame → owning key, for every resident page.
    frames: HashMap<u64, PageKey>,
    resident: ResidentSet,
    used_bytes: u64,
    next_frame: u64,
}

impl PagingManager {
    /// Creates an empty manager with `page_kb` KiB pages.
    pub fn new(page_kb: u64) -> Self {
        Self {
            page_kb,
            tables: HashMap::new(),
            frames: HashMap::new(),
            resident: ResidentSet::default(),
            used_bytes: 0,
            next_frame: 0,
        }
    }

    /// Allocates `ceil(size_kb / page_kb)` resident pages to a process.
    ///
    /// Each page takes the next frame from the monotonically increasing pool
    /// and lands at the most-recently-used end of the resident index.
    ///
    /// # Returns
    ///
    /// The logical page numbers assigned, in order.
    pub fn allocate(&mut self, process: ProcessId, size_kb: u64) -> Vec<u64> {
        let pages = size_kb.div_ceil(self.page_kb);
        let table = self.tables.entry(process).or_default();

        let mut assigned = Vec::with_capacity(pages as usize);
        for _ in 0..pages {
            let frame = self.next_frame;
            self.next_frame += 1;

            let page = table.len() as u64;
            let _ = table.insert(
                page,
                PageTableEntry {
                    frame,
                    present: true,
                    modified: false,
                    referenced: false,
                },
            );

            let _ = self.frames.insert(frame, (process, page));
            self.resident.insert((process, page), frame);
            self.used_bytes += self.page_kb * KIB;
            assigned.push(page);
        }

        debug!(%process, pages, "allocated");
        assigned
    }

    /// Releases every page of a process and drops its table.
    ///
    /// Safe to call for a process with no table or no resident pages; the
    /// second call is a complete no-op.
    pub fn release(&mut self, process: ProcessId) {
        let Some(table) = self.tables.remove(&process) else {
            return;
        };
        for (page, entry) in &table {
            if entry.present {
                let _ = self.frames.remove(&entry.frame);
                let _ = self.resident.remove((process, *page));
                self.used_bytes -= self.page_kb * KIB;
            }
        }
        debug!(%process, "released");
    }

    /// Accesses a page, marking it referenced (and modified on writes) and
    /// promoting it to the most-recently-used position.
    ///
    /// # Errors
    ///
    /// [`AccessError::UnknownProcess`] when the process has no table, and
    /// [`AccessError::NotResident`] when the page has no entry or its entry
    /// is not present. Both are normal fault signals, not failures.
    pub fn access(
        &mut self,
        address: u64,
        process: ProcessId,
        kind: AccessKind,
    ) -> Result<(), AccessError> {
        let page = address / self.page_bytes();

        let Some(table) = self.tables.get_mut(&process) else {
            return Err(AccessError::UnknownProcess(process));
        };
        let Some(entry) = table.get_mut(&page) else {
            return Err(AccessError::NotResident { process, page });
        };

        entry.referenced = true;
        if kind == AccessKind::Write {
            entry.modified = true;
        }
        if !entry.present {
            return Err(AccessError::NotResident { process, page });
        }

        let _ = self.resident.promote((process, page));
        Ok(())
    }

    /// Replaces a victim page with the page containing `new_address`.
    ///
    /// Clears the victim's present flag, hands its frame to the new
    /// (process, page) key, and installs a fresh present entry at the
    /// most-recently-used position, creating the new owner's table if needed.
    /// The caller is responsible for swapping the victim's content out first.
    ///
    /// # Returns
    ///
    /// The reused frame, or `None` when the victim was not resident.
    pub fn replace(
        &mut self,
        victim: PageKey,
        new_address: u64,
        new_process: ProcessId,
    ) -> Option<u64> {
        let frame = self.resident.remove(victim)?;
        let (old_process, old_page) = victim;

        if let Some(table) = self.tables.get_mut(&old_process) {
            if let Some(entry) = table.get_mut(&old_page) {
                entry.present = false;
            }
        }

        // One resident page leaves, one enters: the used-memory counter and
        // the frame count are unchanged by a replacement.
        let new_page = new_address / self.page_bytes();
        let table = self.tables.entry(new_process).or_default();
        let _ = table.insert(
            new_page,
            PageTableEntry {
                frame,
                present: true,
                modified: false,
                referenced: true,
            },
        );

        let _ = self.frames.insert(frame, (new_process, new_page));
        self.resident.insert((new_process, new_page), frame);

        debug!(
            victim_process = %old_process,
            victim_page = old_page,
            %new_process,
            new_page,
            frame,
            "replaced"
        );
        Some(frame)
    }

    /// Page size in bytes.
    pub fn page_bytes(&self) -> u64 {
        self.page_kb * KIB
    }

    /// Physical memory bound to resident pages, in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Read-only view of the resident index.
    pub fn resident(&self) -> &ResidentSet {
        &self.resident
    }

    /// `true` when the process owns a page table.
    pub fn has_table(&self, process: ProcessId) -> bool {
        self.tables.contains_key(&process)
    }

    /// Looks up one page-table entry.
    pub fn entry(&self, process: ProcessId, page: u64) -> Option<PageTableEntry> {
        self.tables.get(&process)?.get(&page).copied()
    }

    /// Paging-shaped memory snapshot.
    pub fn state(&self) -> MemoryState {
        let mut processes: Vec<ProcessId> = self.tables.keys().copied().collect();
        processes.sort_unstable();
        MemoryState::Paging {
            page_bytes: self.page_bytes(),
            resident_pages: self.resident.len(),
            occupied_frames: self.frames.len(),
            used_bytes: self.used_bytes,
            processes,
        }
    }
}
