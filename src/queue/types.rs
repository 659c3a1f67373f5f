use thiserror::Error;

/// Errors returned by [`Queue`](super::Queue) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue lifecycle has ended. Terminal.
    #[error("queue closed")]
    Closed,

    /// A non-blocking read found the buffer empty.
    #[error("no data")]
    NoData,

    /// The caller's context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl QueueError {
    /// Whether the error ends the queue's useful life.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueError::Closed)
    }
}
