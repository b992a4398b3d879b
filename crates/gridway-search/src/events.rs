use gridway_core::Cell;

/// Incremental search progress, pushed to the caller's callback.
///
/// Events borrow the engine's internal buffers, so emission allocates
/// nothing; a consumer that wants to keep the data copies it out. The
/// callback is invoked synchronously at the engine's per-expansion yield
/// point and should return quickly — the engine never waits on it.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    /// A cell was expanded (popped non-stale and its neighbors examined).
    Expanded {
        /// The cell just expanded.
        expanded: Cell,
        /// Every cell expanded so far, in expansion order.
        visited: &'a [Cell],
        /// Best known path from the start to `expanded`.
        partial_path: &'a [Cell],
    },
    /// The search terminated. Always emitted exactly once on success or
    /// on frontier exhaustion, regardless of any emission stride.
    Finished {
        /// Every cell expanded over the whole search.
        visited: &'a [Cell],
        /// The final path, or `None` if no path exists.
        path: Option<&'a [Cell]>,
    },
}

impl ProgressEvent<'_> {
    /// The expanded cells common to both variants.
    pub fn visited(&self) -> &[Cell] {
        match self {
            ProgressEvent::Expanded { visited, .. } => visited,
            ProgressEvent::Finished { visited, .. } => visited,
        }
    }
}
