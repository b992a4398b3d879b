//! A boolean-occupancy grid for pathfinding.
//!
//! [`Grid`] stores one blocked/free flag per cell in a flat row-major
//! buffer. It is built up front, then treated as read-only for the
//! duration of a search: the search engine only ever borrows it.

use crate::Cell;

/// A fixed-size 2D occupancy map. `true` means blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: i32,
    cols: i32,
    blocked: Vec<bool>,
}

impl Grid {
    /// Create a grid of the given dimensions with every cell free.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is not positive.
    pub fn new(rows: i32, cols: i32) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be positive");
        Self {
            rows,
            cols,
            blocked: vec![false; (rows * cols) as usize],
        }
    }

    /// Build a grid from row slices where `0` is free and any other value
    /// is blocked. All rows must have the same length.
    ///
    /// # Panics
    ///
    /// Panics on empty input or ragged rows.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && !rows[0].is_empty(), "grid must be non-empty");
        let cols = rows[0].len();
        let mut grid = Self::new(rows.len() as i32, cols as i32);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "all rows must have equal length");
            for (c, &v) in row.iter().enumerate() {
                grid.blocked[r * cols + c] = v != 0;
            }
        }
        grid
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Whether the grid has zero cells. Always false for a constructed grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Whether `cell` lies inside the grid bounds.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    /// Occupancy at `cell`, or `None` if out of bounds.
    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> Option<bool> {
        self.index_of(cell).map(|i| self.blocked[i])
    }

    /// Bounds-safe traversability: `true` only for in-bounds, free cells.
    #[inline]
    pub fn is_traversable(&self, cell: Cell) -> bool {
        self.is_blocked(cell) == Some(false)
    }

    /// Mark a cell blocked or free. Does nothing if out of bounds.
    ///
    /// Mutation is only meaningful before a search starts; the engine
    /// borrows the grid immutably.
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if let Some(i) = self.index_of(cell) {
            self.blocked[i] = blocked;
        }
    }

    /// The in-bounds axis-aligned neighbors of `cell`, in the fixed
    /// up, down, left, right order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors_4().into_iter().filter(|&n| self.in_bounds(n))
    }

    /// Convert a cell to its flat row-major index. `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some((cell.row * self.cols + cell.col) as usize)
    }

    /// Convert a flat index back to a cell.
    #[inline]
    pub fn cell_at(&self, idx: usize) -> Cell {
        Cell::new(idx as i32 / self.cols, idx as i32 % self.cols)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        let mut g = Grid::new(2, 2);
        g.set_blocked(Cell::new(0, 1), true);
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
