//! The A* engine: expand/relax loop, termination, and progress emission.

use gridway_core::{Cell, Grid, manhattan};

use crate::cancel::CancelToken;
use crate::error::SearchError;
use crate::events::ProgressEvent;
use crate::frontier::Frontier;
use crate::store::{NodeStore, Relax};

/// Engine lifecycle. `Ready` becomes `Running` on the first loop
/// iteration and ends in exactly one of the three terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Running,
    Succeeded,
    Exhausted,
    Cancelled,
}

/// Outcome of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathResult {
    /// Shortest path from start to goal, both endpoints included.
    Found(Vec<Cell>),
    /// The goal is unreachable. A normal outcome, not an error.
    NotFound,
}

impl PathResult {
    /// The path, or `None` for `NotFound`.
    pub fn path(&self) -> Option<&[Cell]> {
        match self {
            PathResult::Found(p) => Some(p),
            PathResult::NotFound => None,
        }
    }

    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }
}

/// Knobs for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    progress_every: usize,
    cancel: Option<CancelToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            progress_every: 1,
            cancel: None,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the per-expansion progress event only every `n`-th expansion
    /// (the terminal event is always emitted). `0` is treated as `1`.
    pub fn progress_every(mut self, n: usize) -> Self {
        self.progress_every = n.max(1);
        self
    }

    /// Attach a cancellation token, checked once per loop iteration.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// A single A* search over a borrowed grid.
///
/// All search state (node store, frontier, visited list) is owned by the
/// engine, so independent searches — even over the same grid — never
/// share anything and may run on different threads.
pub struct AstarEngine<'g> {
    grid: &'g Grid,
    start: Cell,
    goal: Cell,
    options: SearchOptions,
    store: NodeStore,
    frontier: Frontier,
    state: SearchState,
    expansions: usize,
    visited: Vec<Cell>,
    partial: Vec<Cell>,
}

impl<'g> AstarEngine<'g> {
    /// Set up a search. Fails with [`SearchError::InvalidEndpoint`] if
    /// `start` or `goal` is blocked or out of bounds; no search work
    /// happens in that case.
    pub fn new(
        grid: &'g Grid,
        start: Cell,
        goal: Cell,
        options: SearchOptions,
    ) -> Result<Self, SearchError> {
        for cell in [start, goal] {
            if !grid.is_traversable(cell) {
                return Err(SearchError::InvalidEndpoint { cell });
            }
        }

        let mut store = NodeStore::new(grid.rows(), grid.cols());
        let mut frontier = Frontier::new();
        let h = manhattan(start, goal);
        store.relax(start, 0, None, || h);
        frontier.push(start, h);

        Ok(Self {
            grid,
            start,
            goal,
            options,
            store,
            frontier,
            state: SearchState::Ready,
            expansions: 0,
            visited: Vec::new(),
            partial: Vec::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Number of real (non-stale) expansions performed so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Cells expanded so far, in expansion order.
    pub fn visited(&self) -> &[Cell] {
        &self.visited
    }

    /// Run the search to completion without progress reporting.
    pub fn run(&mut self) -> Result<PathResult, SearchError> {
        self.run_inner(None)
    }

    /// Run the search to completion, pushing [`ProgressEvent`]s to
    /// `on_progress` at each yield point.
    pub fn run_with(
        &mut self,
        mut on_progress: impl FnMut(&ProgressEvent<'_>),
    ) -> Result<PathResult, SearchError> {
        self.run_inner(Some(&mut on_progress))
    }

    fn run_inner(
        &mut self,
        mut sink: Option<&mut dyn FnMut(&ProgressEvent<'_>)>,
    ) -> Result<PathResult, SearchError> {
        debug_assert_eq!(self.state, SearchState::Ready, "engine is single-shot");
        self.state = SearchState::Running;

        let grid = self.grid;
        let goal = self.goal;
        let stride = self.options.progress_every.max(1);

        loop {
            if let Some(token) = &self.options.cancel {
                if token.is_cancelled() {
                    self.state = SearchState::Cancelled;
                    log::debug!(
                        "search {} -> {} cancelled after {} expansions",
                        self.start,
                        goal,
                        self.expansions
                    );
                    return Err(SearchError::Cancelled);
                }
            }

            let Some((cell, f)) = self.frontier.pop_min() else {
                self.state = SearchState::Exhausted;
                log::debug!(
                    "search {} -> {} exhausted after {} expansions",
                    self.start,
                    goal,
                    self.expansions
                );
                if let Some(sink) = sink.as_mut() {
                    sink(&ProgressEvent::Finished {
                        visited: &self.visited,
                        path: None,
                    });
                }
                return Ok(PathResult::NotFound);
            };

            // Filter entries superseded by a cheaper relaxation: the slot
            // is either closed already or carries a smaller f now.
            let Some((g, current_f)) = self.store.open_cost(cell) else {
                continue;
            };
            if current_f != f {
                continue;
            }

            if cell == goal {
                let path = self.store.reconstruct_path(goal)?;
                self.state = SearchState::Succeeded;
                log::debug!(
                    "search {} -> {} found path of {} steps after {} expansions",
                    self.start,
                    goal,
                    path.len().saturating_sub(1),
                    self.expansions
                );
                if let Some(sink) = sink.as_mut() {
                    sink(&ProgressEvent::Finished {
                        visited: &self.visited,
                        path: Some(path.as_slice()),
                    });
                }
                return Ok(PathResult::Found(path));
            }

            self.store.close(cell);
            self.expansions += 1;
            self.visited.push(cell);
            log::trace!("expanded {cell} g={g} f={f}");

            if let Some(sink) = sink.as_mut() {
                if self.expansions % stride == 0 {
                    self.store.reconstruct_into(cell, &mut self.partial)?;
                    sink(&ProgressEvent::Expanded {
                        expanded: cell,
                        visited: &self.visited,
                        partial_path: &self.partial,
                    });
                }
            }

            for neighbor in grid.neighbors(cell) {
                if !grid.is_traversable(neighbor) {
                    continue;
                }
                let candidate_g = g + 1;
                match self
                    .store
                    .relax(neighbor, candidate_g, Some(cell), || manhattan(neighbor, goal))
                {
                    Relax::Improved => {
                        let (_, nf) = self
                            .store
                            .open_cost(neighbor)
                            .ok_or(SearchError::BrokenChain)?;
                        self.frontier.push(neighbor, nf);
                    }
                    Relax::NoChange => {}
                }
            }
        }
    }
}

/// Shortest path between two cells, headless.
///
/// Returns `Ok(PathResult::NotFound)` when the goal is unreachable;
/// `Err(SearchError::InvalidEndpoint { .. })` when an endpoint is blocked
/// or out of bounds.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Result<PathResult, SearchError> {
    AstarEngine::new(grid, start, goal, SearchOptions::default())?.run()
}

/// Shortest path with options and a progress callback.
pub fn find_path_with(
    grid: &Grid,
    start: Cell,
    goal: Cell,
    options: SearchOptions,
    on_progress: impl FnMut(&ProgressEvent<'_>),
) -> Result<PathResult, SearchError> {
    AstarEngine::new(grid, start, goal, options)?.run_with(on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Brute-force BFS step count, the optimality oracle.
    fn bfs_distance(grid: &Grid, start: Cell, goal: Cell) -> Option<usize> {
        let mut dist = vec![usize::MAX; grid.len()];
        let mut queue = VecDeque::new();
        dist[grid.index_of(start)?] = 0;
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            let d = dist[grid.index_of(cell)?];
            if cell == goal {
                return Some(d);
            }
            for n in grid.neighbors(cell) {
                if !grid.is_traversable(n) {
                    continue;
                }
                let ni = grid.index_of(n)?;
                if dist[ni] == usize::MAX {
                    dist[ni] = d + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn assert_valid_path(grid: &Grid, path: &[Cell], start: Cell, goal: Cell) {
        assert_eq!(path.first().copied(), Some(start));
        assert_eq!(path.last().copied(), Some(goal));
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1, "path not contiguous");
        }
        for &c in path {
            assert!(grid.is_traversable(c), "path touches blocked cell {c}");
        }
    }

    #[test]
    fn empty_grid_path_length_is_manhattan() {
        let grid = Grid::new(8, 8);
        for (start, goal) in [
            (Cell::new(0, 0), Cell::new(7, 7)),
            (Cell::new(3, 1), Cell::new(0, 6)),
            (Cell::new(5, 5), Cell::new(5, 0)),
        ] {
            let result = find_path(&grid, start, goal).unwrap();
            let path = result.path().unwrap();
            assert_eq!(path.len() as i32 - 1, manhattan(start, goal));
            assert_valid_path(&grid, path, start, goal);
        }
    }

    #[test]
    fn scenario_a_3x3_open() {
        let grid = Grid::new(3, 3);
        let result = find_path(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        let path = result.path().unwrap();
        assert_eq!(path.len(), 5);
        // With the fixed up/down/left/right neighbor order and oldest-first
        // ties, the column-first route wins.
        assert_eq!(
            path,
            &[
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(2, 2),
            ][..]
        );
    }

    #[test]
    fn scenario_b_forced_through_gap() {
        let grid = Grid::from_rows(&[&[0, 0, 0], &[1, 0, 1], &[0, 0, 0]]);
        let result = find_path(&grid, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        let path = result.path().unwrap();
        assert!(path.contains(&Cell::new(1, 1)));
        assert_valid_path(&grid, path, Cell::new(0, 0), Cell::new(2, 2));
    }

    #[test]
    fn scenario_c_blocked_goal_is_rejected() {
        let mut grid = Grid::new(3, 3);
        let goal = Cell::new(2, 2);
        grid.set_blocked(goal, true);
        assert_eq!(
            find_path(&grid, Cell::new(0, 0), goal),
            Err(SearchError::InvalidEndpoint { cell: goal })
        );
    }

    #[test]
    fn out_of_bounds_start_is_rejected() {
        let grid = Grid::new(3, 3);
        let start = Cell::new(-1, 0);
        assert_eq!(
            find_path(&grid, start, Cell::new(2, 2)),
            Err(SearchError::InvalidEndpoint { cell: start })
        );
    }

    #[test]
    fn scenario_d_start_equals_goal() {
        let grid = Grid::new(3, 3);
        let c = Cell::new(1, 1);
        let mut engine = AstarEngine::new(&grid, c, c, SearchOptions::default()).unwrap();
        let result = engine.run().unwrap();
        assert_eq!(result, PathResult::Found(vec![c]));
        assert_eq!(engine.expansions(), 0);
        assert_eq!(engine.state(), SearchState::Succeeded);
    }

    #[test]
    fn scenario_e_enclosed_goal() {
        let grid = Grid::from_rows(&[
            &[0, 0, 0, 0, 0],
            &[0, 1, 1, 1, 0],
            &[0, 1, 0, 1, 0],
            &[0, 1, 1, 1, 0],
            &[0, 0, 0, 0, 0],
        ]);
        let mut engine = AstarEngine::new(
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
            SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(engine.run().unwrap(), PathResult::NotFound);
        assert_eq!(engine.state(), SearchState::Exhausted);
        // Every reachable free cell got expanded exactly once.
        assert_eq!(engine.expansions(), 16);
    }

    #[test]
    fn optimal_on_assorted_small_grids() {
        let grids = [
            Grid::from_rows(&[&[0, 1, 0, 0], &[0, 1, 0, 1], &[0, 0, 0, 1], &[1, 1, 0, 0]]),
            Grid::from_rows(&[&[0, 0, 0], &[0, 1, 0], &[0, 1, 0], &[0, 1, 0], &[0, 0, 0]]),
            Grid::from_rows(&[
                &[0, 0, 1, 0, 0],
                &[1, 0, 1, 0, 1],
                &[0, 0, 0, 0, 0],
                &[0, 1, 1, 1, 0],
                &[0, 0, 0, 1, 0],
            ]),
        ];
        for grid in &grids {
            for goal_idx in 0..grid.len() {
                let start = Cell::new(0, 0);
                let goal = grid.cell_at(goal_idx);
                if !grid.is_traversable(start) || !grid.is_traversable(goal) {
                    continue;
                }
                let oracle = bfs_distance(grid, start, goal);
                match find_path(grid, start, goal).unwrap() {
                    PathResult::Found(path) => {
                        assert_eq!(Some(path.len() - 1), oracle, "suboptimal to {goal}");
                        assert_valid_path(grid, &path, start, goal);
                    }
                    PathResult::NotFound => assert_eq!(oracle, None, "missed path to {goal}"),
                }
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_paths() {
        let grid = Grid::from_rows(&[
            &[0, 0, 0, 1, 0],
            &[0, 1, 0, 1, 0],
            &[0, 1, 0, 0, 0],
            &[0, 0, 0, 1, 0],
        ]);
        let a = find_path(&grid, Cell::new(0, 0), Cell::new(3, 4)).unwrap();
        let b = find_path(&grid, Cell::new(0, 0), Cell::new(3, 4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn one_event_per_expansion_plus_final() {
        let grid = Grid::from_rows(&[&[0, 0, 0], &[1, 0, 1], &[0, 0, 0]]);
        let mut expanded = Vec::new();
        let mut finished = 0usize;
        let mut engine = AstarEngine::new(
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
            SearchOptions::default(),
        )
        .unwrap();
        let result = engine
            .run_with(|event| match event {
                ProgressEvent::Expanded {
                    expanded: cell,
                    partial_path,
                    ..
                } => {
                    // The partial path always ends at the expanded cell.
                    assert_eq!(partial_path.last(), Some(cell));
                    expanded.push(*cell);
                }
                ProgressEvent::Finished { path, .. } => {
                    assert!(path.is_some());
                    finished += 1;
                }
            })
            .unwrap();
        assert!(result.is_found());
        assert_eq!(expanded.len(), engine.expansions());
        assert_eq!(expanded, engine.visited());
        assert_eq!(finished, 1);
    }

    #[test]
    fn final_event_fires_on_not_found_too() {
        let grid = Grid::from_rows(&[&[0, 1, 0], &[1, 1, 0], &[0, 0, 0]]);
        let mut finished_path = Some(vec![]);
        let result = find_path_with(
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
            SearchOptions::default(),
            |event| {
                if let ProgressEvent::Finished { path, .. } = event {
                    finished_path = path.map(<[Cell]>::to_vec);
                }
            },
        )
        .unwrap();
        assert_eq!(result, PathResult::NotFound);
        assert_eq!(finished_path, None);
    }

    #[test]
    fn progress_stride_skips_intermediate_events() {
        let grid = Grid::new(6, 6);
        let mut expanded = 0usize;
        let mut finished = 0usize;
        let mut engine = AstarEngine::new(
            &grid,
            Cell::new(0, 0),
            Cell::new(5, 5),
            SearchOptions::new().progress_every(4),
        )
        .unwrap();
        engine
            .run_with(|event| match event {
                ProgressEvent::Expanded { .. } => expanded += 1,
                ProgressEvent::Finished { .. } => finished += 1,
            })
            .unwrap();
        assert_eq!(expanded, engine.expansions() / 4);
        assert_eq!(finished, 1);
    }

    #[test]
    fn cancellation_stops_the_search() {
        let grid = Grid::new(30, 30);
        let token = CancelToken::new();
        let seen = token.clone();
        let mut engine = AstarEngine::new(
            &grid,
            Cell::new(0, 0),
            Cell::new(29, 29),
            SearchOptions::new().cancel_token(token),
        )
        .unwrap();
        let result = engine.run_with(|_| {
            // Cancel from inside the first progress callback; the engine
            // notices on its next iteration.
            seen.cancel();
        });
        assert_eq!(result, Err(SearchError::Cancelled));
        assert_eq!(engine.state(), SearchState::Cancelled);
        assert!(engine.expansions() < 30 * 30);
    }

    #[test]
    fn pre_cancelled_token_stops_immediately() {
        let grid = Grid::new(4, 4);
        let token = CancelToken::new();
        token.cancel();
        let result = find_path_with(
            &grid,
            Cell::new(0, 0),
            Cell::new(3, 3),
            SearchOptions::new().cancel_token(token),
            |_| {},
        );
        assert_eq!(result, Err(SearchError::Cancelled));
    }
}
