// src/worker/config.rs

use derive_builder::Builder;
use std::time::Duration;

pub const DEFAULT_THREAD_NUM: usize = 1;
pub const DEFAULT_CHAN_SIZE: usize = 100;
pub const DEFAULT_MAX_BATCH_NUM: usize = 50;
pub const DEFAULT_MAX_WAIT_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_IDLE_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct Config {
    /// Number of handler invocations allowed to run at once
    #[builder(default = "DEFAULT_THREAD_NUM")]
    pub(crate) thread_num: usize,

    /// Capacity of the work queue
    #[builder(default = "DEFAULT_CHAN_SIZE")]
    pub(crate) chan_size: usize,

    /// Maximum number of items in a batch before it is dispatched
    #[builder(default = "DEFAULT_MAX_BATCH_NUM")]
    pub(crate) max_batch_num: usize,

    /// Maximum time a cycle spends collecting before dispatching a partial batch
    #[builder(default = "DEFAULT_MAX_WAIT_INTERVAL")]
    pub(crate) max_wait_interval: Duration,

    /// Pause after a cycle that collected nothing
    #[builder(default = "DEFAULT_IDLE_BACKOFF")]
    pub(crate) idle_backoff: Duration,

    /// Reject submissions instead of waiting when every worker is busy
    #[builder(default = "false")]
    pub(crate) nonblocking: bool,

    /// Period of the queue depth report; disabled when `None`
    #[builder(default = "None")]
    pub(crate) report_interval: Option<Duration>,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.thread_num == Some(0) {
            return Err("thread_num must be greater than zero".to_string());
        }
        if self.max_batch_num == Some(0) {
            return Err("max_batch_num must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            thread_num: DEFAULT_THREAD_NUM,
            chan_size: DEFAULT_CHAN_SIZE,
            max_batch_num: DEFAULT_MAX_BATCH_NUM,
            max_wait_interval: DEFAULT_MAX_WAIT_INTERVAL,
            idle_backoff: DEFAULT_IDLE_BACKOFF,
            nonblocking: false,
            report_interval: None,
        }
    }
}

impl Config {
    /// Returns the number of concurrent handler invocations
    #[inline]
    pub fn thread_num(&self) -> usize {
        self.thread_num
    }

    /// Returns the queue capacity
    #[inline]
    pub fn chan_size(&self) -> usize {
        self.chan_size
    }

    /// Returns the batch size ceiling
    #[inline]
    pub fn max_batch_num(&self) -> usize {
        self.max_batch_num
    }

    /// Returns the per-cycle collection deadline
    #[inline]
    pub fn max_wait_interval(&self) -> Duration {
        self.max_wait_interval
    }

    #[inline]
    pub fn idle_backoff(&self) -> Duration {
        self.idle_backoff
    }

    #[inline]
    pub fn nonblocking(&self) -> bool {
        self.nonblocking
    }

    #[inline]
    pub fn report_interval(&self) -> Option<Duration> {
        self.report_interval
    }
}
