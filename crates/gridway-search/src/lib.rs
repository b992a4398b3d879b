//! **gridway-search** — A* shortest-path search over occupancy grids.
//!
//! The search core behind the *gridway* workspace:
//!
//! - [`find_path`] / [`find_path_with`] — one-call entry points
//! - [`AstarEngine`] — the expand/relax loop as an inspectable state machine
//! - [`NodeStore`] — per-cell best-cost bookkeeping and parent links
//! - [`Frontier`] — the priority-ordered open set with deterministic ties
//! - [`ProgressEvent`] — per-expansion reporting for external display
//! - [`CancelToken`] — cooperative cancellation, checked once per iteration
//!
//! The engine is fully deterministic for a fixed grid/start/goal: neighbor
//! order is fixed (up, down, left, right) and equal-`f` frontier ties pop
//! oldest first. Stale frontier entries are filtered lazily on pop rather
//! than updated in place; closed cells reopen when a strictly cheaper path
//! to them is found.
//!
//! # Example
//!
//! ```
//! use gridway_core::{Cell, Grid};
//! use gridway_search::{PathResult, find_path};
//!
//! let mut grid = Grid::new(3, 3);
//! grid.set_blocked(Cell::new(1, 0), true);
//! grid.set_blocked(Cell::new(1, 1), true);
//!
//! let result = find_path(&grid, Cell::new(0, 0), Cell::new(2, 0)).unwrap();
//! match result {
//!     PathResult::Found(path) => assert_eq!(path.len(), 7),
//!     PathResult::NotFound => unreachable!(),
//! }
//! ```

mod cancel;
mod engine;
mod error;
mod events;
mod frontier;
mod store;

pub use cancel::CancelToken;
pub use engine::{AstarEngine, PathResult, SearchOptions, SearchState, find_path, find_path_with};
pub use error::SearchError;
pub use events::ProgressEvent;
pub use frontier::Frontier;
pub use store::{NodeStore, Relax};
