// src/worker/executor.rs

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Semaphore, TryAcquireError};
use tokio_util::task::TaskTracker;

use super::handler::{Handler, Payload};
use super::log::Logger;
use super::types::ExecutorError;

/// Bounded-concurrency service that runs submitted work.
///
/// `submit` returning an error means the payload was not accepted and has
/// been dropped. Callers log and continue; nothing is retried.
#[async_trait]
pub trait Executor<T>: Send + Sync {
    async fn submit(&self, payload: Payload<T>) -> Result<(), ExecutorError>;

    /// Stops admitting work and waits for in-flight work to finish.
    async fn release(&self);
}

/// Runs a [`Handler`] on at most `size` Tokio tasks at once.
///
/// In blocking mode `submit` waits for a free worker; in non-blocking mode
/// it fails with [`ExecutorError::Overloaded`] instead.
pub struct WorkerPool<T> {
    handler: Arc<dyn Handler<T>>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    size: usize,
    nonblocking: bool,
    log: Arc<dyn Logger>,
}

impl<T> WorkerPool<T>
where
    T: Send + 'static,
{
    pub fn new(
        size: usize,
        handler: Arc<dyn Handler<T>>,
        nonblocking: bool,
        log: Arc<dyn Logger>,
    ) -> Result<Self, ExecutorError> {
        if size == 0 {
            return Err(ExecutorError::InvalidSize(size));
        }

        Ok(Self {
            handler,
            permits: Arc::new(Semaphore::new(size)),
            tracker: TaskTracker::new(),
            size,
            nonblocking,
            log,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers currently busy. Racy.
    pub fn running(&self) -> usize {
        self.size.saturating_sub(self.permits.available_permits())
    }
}

#[async_trait]
impl<T> Executor<T> for WorkerPool<T>
where
    T: Send + 'static,
{
    async fn submit(&self, payload: Payload<T>) -> Result<(), ExecutorError> {
        let permit = if self.nonblocking {
            match self.permits.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(TryAcquireError::NoPermits) => return Err(ExecutorError::Overloaded),
                Err(TryAcquireError::Closed) => return Err(ExecutorError::Closed),
            }
        } else {
            self.permits
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| ExecutorError::Closed)?
        };

        let handler = self.handler.clone();
        let log = self.log.clone();
        self.tracker.spawn(async move {
            let _permit = permit;
            let size = payload.len();
            if let Err(err) = handler.handle(payload).await {
                log.error(format_args!("handler failed on {size} item(s): {err}"));
            }
        });
        Ok(())
    }

    async fn release(&self) {
        self.permits.close();
        self.tracker.close();
        self.tracker.wait().await;
    }
}
