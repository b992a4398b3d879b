use crate::Cell;

/// Manhattan (L1) distance between two cells.
///
/// This is the exact 4-connected step distance on an obstacle-free grid,
/// which makes it both admissible and consistent as an A* heuristic under
/// unit step costs.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}
