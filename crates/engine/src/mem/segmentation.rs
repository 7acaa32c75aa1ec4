//! Segmentation manager.
//!
//! The alternative allocator: per-process base/limit segments placed
//! first-fit over an explicit free list. Segmentation has no fault protocol;
//! an access either falls inside a segment or is rejected.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::constants::KIB;
use crate::error::AccessError;
use crate::mem::AccessKind;
use crate::process::ProcessId;
use crate::stats::MemoryState;

/// Segment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentKind {
    /// Program text.
    Code,
    /// Heap and globals.
    Data,
    /// Stack.
    Stack,
}

/// One base/limit segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// First byte of the segment.
    pub base: u64,
    /// Segment length in bytes; the segment spans `[base, base + limit)`.
    pub limit: u64,
    /// Classification.
    pub kind: SegmentKind,
}

/// First-fit segment allocator with a coalescing free list.
#[derive(Debug)]
pub struct SegmentationManager {
    segments: HashMap<ProcessId, Vec<Segment>>,
    /// Free gaps as (base, length), sorted by base.
    free: Vec<(u64, u64)>,
    used_bytes: u64,
}

impl SegmentationManager {
    /// Creates a manager whose single initial gap spans all of physical
    /// memory.
    pub fn new(total_kb: u64) -> Self {
        Self {
            segments: HashMap::new(),
            free: vec![(0, total_kb * KIB)],
            used_bytes: 0,
        }
    }

    /// Carves a code segment of `size` bytes out of the first gap that fits.
    ///
    /// # Returns
    ///
    /// The placed segment, or `None` when no gap is large enough.
    pub fn allocate(&mut self, process: ProcessId, size: u64) -> Option<Segment> {
        let position = self.free.iter().position(|(_, length)| *length >= size)?;
        let (base, length) = self.free[position];
        if length == size {
            let _ = self.free.remove(position);
        } else {
            self.free[position] = (base + size, length - size);
        }

        let segment = Segment {
            base,
            limit: size,
            kind: SegmentKind::Code,
        };
        self.segments.entry(process).or_default().push(segment);
        self.used_bytes += size;

        debug!(%process, base, size, "segment placed");
        Some(segment)
    }

    /// Returns every segment of a process to the free list, coalescing
    /// adjacent gaps. Unknown processes and repeated calls are no-ops.
    pub fn release(&mut self, process: ProcessId) {
        let Some(segments) = self.segments.remove(&process) else {
            return;
        };
        for segment in segments {
            self.used_bytes -= segment.limit;
            self.free.push((segment.base, segment.limit));
        }
        self.coalesce();
        debug!(%process, "segments released");
    }

    /// Checks an address against the process's segments.
    ///
    /// # Errors
    ///
    /// [`AccessError::UnknownProcess`] when the process owns no segments,
    /// [`AccessError::SegmentViolation`] when the address is outside all of
    /// them.
    pub fn access(
        &self,
        address: u64,
        process: ProcessId,
        _kind: AccessKind,
    ) -> Result<(), AccessError> {
        let Some(segments) = self.segments.get(&process) else {
            return Err(AccessError::UnknownProcess(process));
        };
        let inside = segments
            .iter()
            .any(|segment| address >= segment.base && address < segment.base + segment.limit);
        if inside {
            Ok(())
        } else {
            Err(AccessError::SegmentViolation { process, address })
        }
    }

    /// Physical memory bound to segments, in bytes.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Segments owned by a process.
    pub fn segments_of(&self, process: ProcessId) -> &[Segment] {
        self.segments
            .get(&process)
            .map_or(&[], Vec::as_slice)
    }

    /// Segmentation-shaped memory snapshot.
    pub fn state(&self) -> MemoryState {
        let mut processes: Vec<ProcessId> = self.segments.keys().copied().collect();
        processes.sort_unstable();
        MemoryState::Segmentation {
            active_segments: self.segments.values().map(Vec::len).sum(),
            used_bytes: self.used_bytes,
            processes,
        }
    }

    fn coalesce(&mut self) {
        self.free.sort_unstable_by_key(|(base, _)| *base);
        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(self.free.len());
        for (base, length) in self.free.drain(..) {
            match merged.last_mut() {
                Some((last_base, last_length)) if *last_base + *last_length == base => {
                    *last_length += length;
                }
                _ => merged.push((base, length)),
            }
        }
        self.free = merged;
    }
}
