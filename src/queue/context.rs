use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use super::types::QueueError;

/// Call-scoped cancellation for queue operations.
///
/// Combines a [`CancellationToken`] with an optional deadline. Independent of
/// the queue's own lifecycle: cancelling a context only affects calls made
/// with it.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never fires on its own.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Cancels this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the reason the context is done, or `None` while it is live.
    pub fn err(&self) -> Option<QueueError> {
        if self.cancel.is_cancelled() {
            return Some(QueueError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Some(QueueError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    pub async fn done(&self) -> QueueError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancel.cancelled() => QueueError::Cancelled,
                _ = sleep_until(deadline) => QueueError::DeadlineExceeded,
            },
            None => {
                self.cancel.cancelled().await;
                QueueError::Cancelled
            }
        }
    }
}
