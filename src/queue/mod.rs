pub mod context;
pub mod queue;
pub mod types;

pub use context::CallContext;
pub use queue::{DEFAULT_CAPACITY, Queue};
pub use types::QueueError;

#[cfg(test)]
mod tests;
