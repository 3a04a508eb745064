//! Shared cancellation flag for a scan run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set-once cancellation flag shared between the controlling context and the
/// scan worker. Observed at pair boundaries and inside every throttle or
/// cooldown wait.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
