use thiserror::Error;

use crate::queue::QueueError;

/// Error type handlers may return; the pool logs it and moves on.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Reasons an [`Executor`](super::Executor) refused a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Every worker is busy and the executor does not wait for one.
    #[error("executor overloaded")]
    Overloaded,

    /// The executor was released.
    #[error("executor closed")]
    Closed,

    #[error("invalid pool size: {0}")]
    InvalidSize(usize),
}

/// Errors raised while building or running a [`Worker`](super::Worker).
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("no task handler")]
    MissingHandler,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be created.
    #[error("init pool failed")]
    Pool(#[source] ExecutorError),

    /// A dispatch loop is already running on this worker.
    #[error("worker already running")]
    AlreadyRunning,

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

impl From<super::config::ConfigBuilderError> for WorkerError {
    fn from(err: super::config::ConfigBuilderError) -> Self {
        WorkerError::InvalidConfig(err.to_string())
    }
}
