use gridway_core::Cell;
use thiserror::Error;

/// Failures a search can report.
///
/// An exhausted frontier is *not* an error: it is the normal
/// [`PathResult::NotFound`](crate::PathResult::NotFound) outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Start or goal is blocked or out of bounds. Rejected before any
    /// search work happens.
    #[error("invalid endpoint {cell}: blocked or out of bounds")]
    InvalidEndpoint { cell: Cell },

    /// The parent chain was cyclic or hit an undiscovered cell during
    /// path reconstruction. This indicates a bug in the search itself and
    /// must not be caught and retried.
    #[error("broken parent chain during path reconstruction")]
    BrokenChain,

    /// The search was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("search cancelled")]
    Cancelled,
}
