// src/worker/handler.rs

use async_trait::async_trait;
use std::future::Future;

use super::types::HandlerError;

/// Unit of work handed to a [`Handler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<T> {
    /// One item, from single-item dispatch.
    Item(T),
    /// Items collected in one cycle, in enqueue order.
    Batch(Vec<T>),
}

impl<T> Payload<T> {
    pub fn len(&self) -> usize {
        match self {
            Payload::Item(_) => 1,
            Payload::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Payload::Item(item) => vec![item],
            Payload::Batch(items) => items,
        }
    }
}

#[async_trait]
pub trait Handler<T>: Send + Sync {
    async fn handle(&self, payload: Payload<T>) -> Result<(), HandlerError>;
}

#[async_trait]
impl<T, F, Fut> Handler<T> for F
where
    F: Fn(Payload<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send,
    T: Send + 'static,
{
    async fn handle(&self, payload: Payload<T>) -> Result<(), HandlerError> {
        self(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_len() {
        assert_eq!(Payload::Item(1).len(), 1);
        assert_eq!(Payload::Batch(vec![1, 2, 3]).len(), 3);
        assert!(Payload::<i32>::Batch(Vec::new()).is_empty());
    }

    #[test]
    fn test_payload_into_vec() {
        assert_eq!(Payload::Item("a").into_vec(), vec!["a"]);
        assert_eq!(Payload::Batch(vec!["a", "b"]).into_vec(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_closure_handler() {
        let handler = |payload: Payload<i32>| async move {
            if payload.len() > 2 {
                return Err::<(), HandlerError>("too many".into());
            }
            Ok(())
        };

        assert!(handler.handle(Payload::Item(1)).await.is_ok());
        let err = handler
            .handle(Payload::Batch(vec![1, 2, 3]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "too many");
    }
}
