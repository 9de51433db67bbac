//! Per-run cancellation signal

use tokio_util::sync::CancellationToken;

/// A one-way stop signal shared by every task of a run
///
/// The signal starts inactive and can only become active. Activating it again
/// changes nothing, and checking it never consumes it, so any number of tasks
/// observe the same state. Each run gets a fresh signal.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the signal; idempotent
    pub fn activate(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the signal is active
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
