use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::queue::{CallContext, Queue, QueueError};

use super::accumulator::BatchAccumulator;
use super::config::Config;
use super::dispatcher::SingleItemDispatcher;
use super::executor::{Executor, WorkerPool};
use super::handler::Handler;
use super::log::{Logger, NoopLogger};
use super::types::WorkerError;

/// Queue plus worker pool, driven by one of two dispatch loops.
///
/// Call [`Worker::run`] for single-item dispatch or [`Worker::run_batch`]
/// for batched dispatch. Only one loop may run per worker; both stop once
/// the queue is closed and release the pool on the way out.
pub struct Worker<T> {
    config: Config,
    queue: Queue<T>,
    log: Arc<dyn Logger>,
    dispatcher: SingleItemDispatcher<T>,
    accumulator: BatchAccumulator<T>,
    running: AtomicBool,
}

impl<T> Worker<T>
where
    T: Send + 'static,
{
    pub fn builder() -> WorkerBuilder<T> {
        WorkerBuilder::default()
    }

    pub fn new<H>(config: Config, handler: H) -> Result<Self, WorkerError>
    where
        H: Handler<T> + 'static,
    {
        Self::with_logger(config, handler, None)
    }

    /// Like [`Worker::new`]; a missing logger falls back to [`NoopLogger`].
    pub fn with_logger<H>(
        config: Config,
        handler: H,
        log: Option<Arc<dyn Logger>>,
    ) -> Result<Self, WorkerError>
    where
        H: Handler<T> + 'static,
    {
        let mut builder = Self::builder().config(config).handler(handler);
        if let Some(log) = log {
            builder = builder.logger(log);
        }
        builder.build()
    }

    fn from_parts(
        config: Config,
        handler: Arc<dyn Handler<T>>,
        log: Arc<dyn Logger>,
    ) -> Result<Self, WorkerError> {
        let pool = WorkerPool::new(config.thread_num, handler, config.nonblocking, log.clone())
            .map_err(WorkerError::Pool)?;
        let executor: Arc<dyn Executor<T>> = Arc::new(pool);
        let queue = Queue::new(config.chan_size);

        Ok(Self {
            dispatcher: SingleItemDispatcher::new(queue.clone(), executor.clone(), log.clone()),
            accumulator: BatchAccumulator::new(queue.clone(), executor, log.clone(), &config),
            config,
            queue,
            log,
            running: AtomicBool::new(false),
        })
    }

    /// Enqueues one item. Failures are logged and returned.
    pub async fn put(&self, ctx: &CallContext, item: T) -> Result<(), QueueError> {
        match self.queue.put(ctx, item).await {
            Ok(()) => {
                self.log.debug(format_args!(
                    "add task success, current queue len: {}",
                    self.queue.len()
                ));
                Ok(())
            }
            Err(err) => {
                self.log
                    .error(format_args!("put task data failed, err: {err}"));
                Err(err)
            }
        }
    }

    /// Single-item dispatch until the queue closes.
    pub async fn run(&self) -> Result<(), WorkerError> {
        self.start()?;
        self.dispatcher.run().await;
        Ok(())
    }

    /// Batched dispatch until the queue closes.
    ///
    /// The queue depth reporter, when configured, runs inside this future and
    /// stops with it.
    pub async fn run_batch(&self) -> Result<(), WorkerError> {
        self.start()?;
        tokio::select! {
            biased;
            _ = self.accumulator.run() => {}
            _ = self.report_queue_depth() => {}
        }
        Ok(())
    }

    /// Closes the queue; the running loop flushes what it holds and stops.
    pub fn close(&self) {
        self.queue.close();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queue(&self) -> &Queue<T> {
        &self.queue
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Wall time of the last batch cycle. Zero outside batch mode.
    pub fn last_cycle_elapsed(&self) -> Duration {
        self.accumulator.last_cycle_elapsed()
    }

    fn start(&self) -> Result<(), WorkerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(WorkerError::AlreadyRunning);
        }
        Ok(())
    }

    /// Logs the queue length every `report_interval`. Never completes.
    async fn report_queue_depth(&self) {
        let Some(every) = self.config.report_interval else {
            return std::future::pending().await;
        };

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.log
                .info(format_args!("tasks in queue: {}", self.queue.len()));
        }
    }
}

/// Assembles a [`Worker`]; `build` fails without a handler.
pub struct WorkerBuilder<T> {
    config: Config,
    handler: Option<Arc<dyn Handler<T>>>,
    log: Option<Arc<dyn Logger>>,
}

impl<T> Default for WorkerBuilder<T> {
    fn default() -> Self {
        Self {
            config: Config::default(),
            handler: None,
            log: None,
        }
    }
}

impl<T> WorkerBuilder<T>
where
    T: Send + 'static,
{
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: Handler<T> + 'static,
    {
        let handler: Arc<dyn Handler<T>> = Arc::new(handler);
        self.handler = Some(handler);
        self
    }

    pub fn logger(mut self, log: Arc<dyn Logger>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn build(self) -> Result<Worker<T>, WorkerError> {
        let handler = self.handler.ok_or(WorkerError::MissingHandler)?;
        let log = self.log.unwrap_or_else(|| Arc::new(NoopLogger));
        Worker::from_parts(self.config, handler, log)
    }
}
