//! Per-cell best-cost bookkeeping and parent links.
//!
//! The store keeps one slot per grid cell in a flat row-major array, with
//! parent links held as flat indices (`NO_PARENT` marking the start). This
//! keeps the parent chain a non-owning relation: reconstruction walks
//! indices, and the whole store is dropped when the search call returns.

use gridway_core::Cell;

use crate::error::SearchError;

/// Sentinel parent index for the start node.
const NO_PARENT: usize = usize::MAX;

/// Outcome of a relaxation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relax {
    /// The candidate cost was strictly better; `(g, h, parent)` were
    /// replaced together.
    Improved,
    /// The cell already has an equal or better cost; nothing changed.
    NoChange,
}

#[derive(Clone)]
struct Slot {
    g: i32,
    h: i32,
    parent: usize,
    discovered: bool,
    open: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            g: 0,
            h: 0,
            parent: NO_PARENT,
            discovered: false,
            open: false,
        }
    }
}

/// Owns the search state of every discovered cell: best-known `g`, cached
/// heuristic `h`, parent link, and open/closed status.
pub struct NodeStore {
    rows: i32,
    cols: i32,
    slots: Vec<Slot>,
}

impl NodeStore {
    /// Create a store covering a `rows x cols` grid, all cells undiscovered.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            slots: vec![Slot::default(); (rows * cols).max(0) as usize],
        }
    }

    /// Best known `g` for a cell, or `None` if undiscovered.
    pub fn best_cost(&self, cell: Cell) -> Option<i32> {
        let slot = &self.slots[self.idx(cell)?];
        slot.discovered.then_some(slot.g)
    }

    /// Current `(g, f)` for a cell that is still on the frontier.
    ///
    /// Returns `None` for undiscovered or closed cells, which lets the
    /// engine filter stale frontier entries in one query.
    pub(crate) fn open_cost(&self, cell: Cell) -> Option<(i32, i32)> {
        let slot = &self.slots[self.idx(cell)?];
        (slot.discovered && slot.open).then_some((slot.g, slot.g + slot.h))
    }

    /// Attempt to improve a cell's best cost.
    ///
    /// If the cell is undiscovered or `candidate_g` is strictly smaller
    /// than its stored `g`, the slot's `(g, h, parent)` are replaced
    /// together, the cell is (re)opened, and `Relax::Improved` is returned.
    /// On equal cost the existing entry wins, so the first-discovered
    /// shortest path is kept.
    ///
    /// `h` is only invoked on first discovery; afterwards the cached
    /// estimate is reused. Out-of-range cells are reported as `NoChange`.
    pub fn relax(
        &mut self,
        cell: Cell,
        candidate_g: i32,
        parent: Option<Cell>,
        h: impl FnOnce() -> i32,
    ) -> Relax {
        let parent_idx = match parent {
            Some(p) => match self.idx(p) {
                Some(i) => i,
                None => return Relax::NoChange,
            },
            None => NO_PARENT,
        };
        let Some(i) = self.idx(cell) else {
            return Relax::NoChange;
        };
        let slot = &mut self.slots[i];
        if slot.discovered {
            if candidate_g >= slot.g {
                return Relax::NoChange;
            }
        } else {
            slot.h = h();
            slot.discovered = true;
        }
        slot.g = candidate_g;
        slot.parent = parent_idx;
        slot.open = true;
        Relax::Improved
    }

    /// Mark a cell as expanded (closed). The cell must be discovered.
    pub(crate) fn close(&mut self, cell: Cell) {
        if let Some(i) = self.idx(cell) {
            self.slots[i].open = false;
        }
    }

    /// Walk parent links from `cell` back to the start and return the path
    /// in start-to-`cell` order.
    ///
    /// Fails with [`SearchError::BrokenChain`] if the walk hits an
    /// undiscovered cell or runs longer than the store has slots (a cycle).
    /// Neither can happen when the relax contract holds.
    pub fn reconstruct_path(&self, cell: Cell) -> Result<Vec<Cell>, SearchError> {
        let mut path = Vec::new();
        self.reconstruct_into(cell, &mut path)?;
        Ok(path)
    }

    /// [`reconstruct_path`](Self::reconstruct_path) into a reused buffer.
    pub(crate) fn reconstruct_into(
        &self,
        cell: Cell,
        path: &mut Vec<Cell>,
    ) -> Result<(), SearchError> {
        path.clear();
        let mut i = self.idx(cell).ok_or(SearchError::BrokenChain)?;
        loop {
            if path.len() > self.slots.len() {
                return Err(SearchError::BrokenChain);
            }
            let slot = &self.slots[i];
            if !slot.discovered {
                return Err(SearchError::BrokenChain);
            }
            path.push(self.cell(i));
            if slot.parent == NO_PARENT {
                break;
            }
            if slot.parent >= self.slots.len() {
                return Err(SearchError::BrokenChain);
            }
            i = slot.parent;
        }
        path.reverse();
        Ok(())
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Option<usize> {
        if cell.row < 0 || cell.row >= self.rows || cell.col < 0 || cell.col >= self.cols {
            return None;
        }
        Some((cell.row * self.cols + cell.col) as usize)
    }

    #[inline]
    fn cell(&self, idx: usize) -> Cell {
        Cell::new(idx as i32 / self.cols, idx as i32 % self.cols)
    }
}
