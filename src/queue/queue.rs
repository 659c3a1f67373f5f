use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use super::context::CallContext;
use super::types::QueueError;

/// Capacity used when a queue is requested with zero capacity.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Bounded FIFO queue with a closable lifecycle.
///
/// Every blocking operation races three signals: the queue lifecycle, the
/// caller's [`CallContext`], and buffer readiness. When more than one is
/// ready at the same time the outcome is unspecified; callers must not rely
/// on which error wins. This implementation checks the lifecycle first, then
/// the context, then the buffer.
///
/// Closing does not clear the buffer. Items enqueued before [`Queue::close`]
/// stay counted by [`Queue::len`] and can be taken out with [`Queue::drain`],
/// but `get` and `put` report [`QueueError::Closed`] from then on.
pub struct Queue<T> {
    sender: mpsc::Sender<T>,
    receiver: Arc<Mutex<mpsc::Receiver<T>>>,
    closed: CancellationToken,
    capacity: usize,
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            closed: self.closed.clone(),
            capacity: self.capacity,
        }
    }
}

impl<T> Queue<T>
where
    T: Send,
{
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        let (sender, receiver) = mpsc::channel(capacity);

        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            closed: CancellationToken::new(),
            capacity,
        }
    }

    /// Enqueues `item`, waiting for free space.
    ///
    /// On error the item is dropped and not enqueued.
    pub async fn put(&self, ctx: &CallContext, item: T) -> Result<(), QueueError> {
        let permit = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(QueueError::Closed),
            err = ctx.done() => return Err(err),
            permit = self.sender.reserve() => permit.map_err(|_| QueueError::Closed)?,
        };
        permit.send(item);
        Ok(())
    }

    /// Dequeues the oldest item, waiting until one is available.
    pub async fn get(&self, ctx: &CallContext) -> Result<T, QueueError> {
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(QueueError::Closed),
            err = ctx.done() => Err(err),
            item = async {
                let mut rx = self.receiver.lock().await;
                rx.recv().await
            } => item.ok_or(QueueError::Closed),
        }
    }

    /// Dequeues the oldest item or fails with [`QueueError::NoData`] at once.
    pub fn get_non_blocking(&self, ctx: &CallContext) -> Result<T, QueueError> {
        if self.closed.is_cancelled() {
            return Err(QueueError::Closed);
        }
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        // Another reader holding the lock means nothing is free for us now.
        let Ok(mut rx) = self.receiver.try_lock() else {
            return Err(QueueError::NoData);
        };
        match rx.try_recv() {
            Ok(item) => Ok(item),
            Err(TryRecvError::Empty) => Err(QueueError::NoData),
            Err(TryRecvError::Disconnected) => Err(QueueError::Closed),
        }
    }

    /// Ends the queue lifecycle. Idempotent and non-blocking.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Resolves once the queue is closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Takes every item still buffered, in FIFO order.
    ///
    /// Works whether or not the queue is closed; intended for collecting what
    /// a stopped consumer left behind.
    pub async fn drain(&self) -> Vec<T> {
        let mut rx = self.receiver.lock().await;
        let mut items = Vec::new();
        while let Ok(item) = rx.try_recv() {
            items.push(item);
        }
        items
    }

    /// Number of buffered items. Racy; for observability only.
    pub fn len(&self) -> usize {
        self.capacity - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free slots. Racy; for observability only.
    pub fn remaining(&self) -> usize {
        self.sender.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
