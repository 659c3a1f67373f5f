// src/worker/accumulator.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep};

use crate::queue::{CallContext, Queue, QueueError};

use super::config::Config;
use super::executor::Executor;
use super::handler::Payload;
use super::log::Logger;

/// Why a collection cycle stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleEnd {
    Full,
    Deadline,
    Failed(QueueError),
}

/// Drains the queue into batches bounded by count and wait time.
///
/// Each cycle collects for at most `max_wait_interval` or until
/// `max_batch_num` items are in hand, then hands the batch to the executor.
/// Collection happens inline on the loop's own task and the batch is a local
/// of the cycle, so once the deadline fires nothing else can append to it.
pub struct BatchAccumulator<T> {
    queue: Queue<T>,
    executor: Arc<dyn Executor<T>>,
    log: Arc<dyn Logger>,
    max_batch_num: usize,
    max_wait_interval: Duration,
    idle_backoff: Duration,
    last_cycle_micros: AtomicU64,
}

impl<T> BatchAccumulator<T>
where
    T: Send + 'static,
{
    pub fn new(
        queue: Queue<T>,
        executor: Arc<dyn Executor<T>>,
        log: Arc<dyn Logger>,
        config: &Config,
    ) -> Self {
        Self {
            queue,
            executor,
            log,
            max_batch_num: config.max_batch_num,
            max_wait_interval: config.max_wait_interval,
            idle_backoff: config.idle_backoff,
            last_cycle_micros: AtomicU64::new(0),
        }
    }

    /// Wall time of the most recent cycle. For observability only.
    pub fn last_cycle_elapsed(&self) -> Duration {
        Duration::from_micros(self.last_cycle_micros.load(Ordering::Relaxed))
    }

    /// Runs cycles until the queue closes, then releases the executor.
    ///
    /// A batch collected before the close was observed is still dispatched.
    pub async fn run(&self) {
        loop {
            let start = Instant::now();
            let (batch, end) = self.collect(start + self.max_wait_interval).await;

            let closed = match end {
                CycleEnd::Full => false,
                CycleEnd::Deadline => false,
                CycleEnd::Failed(err) => {
                    self.log
                        .error(format_args!("get task data failed, err: {err}"));
                    err.is_terminal()
                }
            };

            if batch.is_empty() {
                self.record(start);
                if closed {
                    break;
                }
                self.log.debug(format_args!("no data, sleep a wheel"));
                tokio::select! {
                    _ = sleep(self.idle_backoff) => {}
                    _ = self.queue.closed() => {}
                }
                continue;
            }

            self.dispatch(batch).await;
            self.record(start);

            if closed {
                break;
            }
        }

        self.executor.release().await;
        self.log.debug(format_args!("batch accumulator terminated"));
    }

    async fn collect(&self, deadline: Instant) -> (Vec<T>, CycleEnd) {
        let ctx = CallContext::with_deadline(deadline);
        let mut batch = Vec::with_capacity(self.max_batch_num);

        while batch.len() < self.max_batch_num {
            match self.queue.get(&ctx).await {
                Ok(item) => batch.push(item),
                Err(QueueError::DeadlineExceeded) => {
                    self.log.debug(format_args!(
                        "cycle deadline reached, messages size: {}",
                        batch.len()
                    ));
                    return (batch, CycleEnd::Deadline);
                }
                Err(err) => return (batch, CycleEnd::Failed(err)),
            }
        }

        self.log
            .debug(format_args!("batch full, messages size: {}", batch.len()));
        (batch, CycleEnd::Full)
    }

    async fn dispatch(&self, batch: Vec<T>) {
        let size = batch.len();
        self.log.debug(format_args!("task data size: {size}"));

        match self.executor.submit(Payload::Batch(batch)).await {
            Ok(()) => self.log.debug(format_args!(
                "process task success, current queue len: {}",
                self.queue.len()
            )),
            Err(err) => self.log.error(format_args!(
                "pool invoke failed, dropped {size} item(s), err: {err}"
            )),
        }
    }

    fn record(&self, start: Instant) {
        let elapsed = start.elapsed();
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.last_cycle_micros.store(micros, Ordering::Relaxed);
        self.log
            .debug(format_args!("task elapsed {}ms", elapsed.as_millis()));
    }
}
