pub mod accumulator;
pub mod config;
pub mod dispatcher;
pub mod executor;
pub mod handler;
pub mod log;
pub mod types;
pub mod worker;

pub use accumulator::BatchAccumulator;
pub use config::{Config, ConfigBuilder};
pub use dispatcher::SingleItemDispatcher;
pub use executor::{Executor, WorkerPool};
pub use handler::{Handler, Payload};
pub use log::{Logger, NoopLogger, TracingLogger};
pub use types::{ExecutorError, HandlerError, WorkerError};
pub use worker::{Worker, WorkerBuilder};
