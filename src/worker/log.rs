use std::fmt;

/// Logging sink handed to every component that reports progress.
///
/// Implementations must be cheap to call; the dispatch loops log on every
/// unit of work.
pub trait Logger: Send + Sync {
    fn info(&self, args: fmt::Arguments<'_>);
    fn debug(&self, args: fmt::Arguments<'_>);
    fn error(&self, args: fmt::Arguments<'_>);
}

/// Discards everything. Used when no logger is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _args: fmt::Arguments<'_>) {}
    fn debug(&self, _args: fmt::Arguments<'_>) {}
    fn error(&self, _args: fmt::Arguments<'_>) {}
}

/// Forwards to the `tracing` macros under the `batch_worker` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "batch_worker", "{}", args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "batch_worker", "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "batch_worker", "{}", args);
    }
}
