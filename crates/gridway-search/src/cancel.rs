use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A clonable handle for cancelling an in-flight search.
///
/// The engine checks the token once per loop iteration, so cancellation
/// takes effect before the next expansion. Clones share the same flag and
/// the token is `Send + Sync`, so a cancel may come from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
