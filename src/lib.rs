//! # batch-worker
//!
//! A bounded work queue feeding a bounded pool of concurrent workers, built on
//! Tokio.
//!
//! ## Features
//!
//! - **Backpressure** via a fixed-capacity queue with per-call deadlines
//! - **Batched dispatch** flushed on a count or wait-time threshold
//! - **Single-item dispatch** for handlers that want one item at a time
//! - **Bounded concurrency** for handler invocations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use batch_worker::queue::CallContext;
//! use batch_worker::worker::{ConfigBuilder, Payload, Worker};
//! use std::time::Duration;
//!
//! let config = ConfigBuilder::default()
//!     .max_batch_num(20usize)
//!     .max_wait_interval(Duration::from_millis(500))
//!     .build()?;
//!
//! let worker = Worker::new(config, |payload: Payload<u64>| async move {
//!     println!("got {} item(s)", payload.len());
//!     Ok(())
//! })?;
//!
//! worker.put(&CallContext::background(), 42).await?;
//! worker.run_batch().await;
//! ```
//!
//! ## Modules
//!
//! - [`queue`] - Cancellable bounded FIFO queue
//! - [`worker`] - Dispatch loops, executor and handler plumbing

pub mod queue;
pub mod worker;
