//! The open set: a priority queue of candidate cells ordered by `f`.
//!
//! Entries are never updated in place. A cheaper path to an already-queued
//! cell simply pushes a second entry; the superseded one is filtered out by
//! the engine on pop. This trades an O(1)-membership open set for a plain
//! binary heap plus a staleness check — see the engine's pop loop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gridway_core::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f: i32,
    seq: u64,
    cell: Cell,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the std max-heap pops smallest f first; ties go to
        // the oldest entry (smallest seq) for reproducible traces.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-ordered frontier of not-yet-expanded cells.
#[derive(Default)]
pub struct Frontier {
    heap: BinaryHeap<OpenEntry>,
    seq: u64,
}

impl Frontier {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a cell with estimated total cost `f`. Duplicates are allowed.
    pub fn push(&mut self, cell: Cell, f: i32) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(OpenEntry { f, seq, cell });
    }

    /// Remove and return the entry with the smallest `f` (oldest first on
    /// ties), or `None` if the frontier is exhausted.
    pub fn pop_min(&mut self) -> Option<(Cell, i32)> {
        self.heap.pop().map(|e| (e.cell, e.f))
    }

    /// Number of queued entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no entries remain.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
