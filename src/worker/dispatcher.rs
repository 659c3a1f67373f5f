use std::sync::Arc;

use crate::queue::{CallContext, Queue};

use super::executor::Executor;
use super::handler::Payload;
use super::log::Logger;

/// Forwards queued items to the executor one at a time.
pub struct SingleItemDispatcher<T> {
    queue: Queue<T>,
    executor: Arc<dyn Executor<T>>,
    log: Arc<dyn Logger>,
}

impl<T> SingleItemDispatcher<T>
where
    T: Send + 'static,
{
    pub fn new(queue: Queue<T>, executor: Arc<dyn Executor<T>>, log: Arc<dyn Logger>) -> Self {
        Self {
            queue,
            executor,
            log,
        }
    }

    /// Runs until the queue closes, then releases the executor.
    pub async fn run(&self) {
        let ctx = CallContext::background();

        loop {
            let item = match self.queue.get(&ctx).await {
                Ok(item) => item,
                Err(err) => {
                    self.log
                        .error(format_args!("get task data failed, err: {err}"));
                    break;
                }
            };

            match self.executor.submit(Payload::Item(item)).await {
                Ok(()) => self.log.debug(format_args!(
                    "process task success, current queue len: {}",
                    self.queue.len()
                )),
                Err(err) => self
                    .log
                    .error(format_args!("pool invoke failed, err: {err}")),
            }
        }

        self.executor.release().await;
        self.log.debug(format_args!("single item dispatcher terminated"));
    }
}
