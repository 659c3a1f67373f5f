use super::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

#[tokio::test]
async fn test_fifo_order() {
    let queue: Queue<i32> = Queue::new(10);
    let ctx = CallContext::background();

    for i in 0..10 {
        queue.put(&ctx, i).await.unwrap();
    }
    assert_eq!(queue.len(), 10);
    assert_eq!(queue.remaining(), 0);

    for i in 0..10 {
        assert_eq!(queue.get(&ctx).await.unwrap(), i);
    }
    assert!(queue.is_empty());
}

#[test]
fn test_zero_capacity_is_coerced() {
    let queue: Queue<i32> = Queue::new(0);
    assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
    assert_eq!(queue.remaining(), DEFAULT_CAPACITY);
}

#[tokio::test(start_paused = true)]
async fn test_put_on_full_queue_times_out() {
    let queue: Queue<i32> = Queue::new(1);
    queue.put(&CallContext::background(), 1).await.unwrap();

    let started = Instant::now();
    let ctx = CallContext::with_timeout(Duration::from_millis(50));
    let err = queue.put(&ctx, 2).await.unwrap_err();

    assert_eq!(err, QueueError::DeadlineExceeded);
    assert!(started.elapsed() >= Duration::from_millis(50));
    // Rejected item was not enqueued
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.get(&CallContext::background()).await.unwrap(), 1);
    assert_eq!(
        queue.get_non_blocking(&CallContext::background()),
        Err(QueueError::NoData)
    );
}

#[tokio::test]
async fn test_put_unblocks_when_space_frees() {
    let queue: Queue<i32> = Queue::new(1);
    let ctx = CallContext::background();
    queue.put(&ctx, 1).await.unwrap();

    let producer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.put(&CallContext::background(), 2).await })
    };

    sleep(Duration::from_millis(20)).await;
    assert!(!producer.is_finished());

    assert_eq!(queue.get(&ctx).await.unwrap(), 1);
    producer.await.unwrap().unwrap();
    assert_eq!(queue.get(&ctx).await.unwrap(), 2);
}

#[tokio::test]
async fn test_put_cancelled_by_context() {
    let queue: Queue<i32> = Queue::new(1);
    queue.put(&CallContext::background(), 1).await.unwrap();

    let ctx = CallContext::background();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    assert_eq!(queue.put(&ctx, 2).await, Err(QueueError::Cancelled));
    assert_eq!(queue.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_get_on_empty_queue_times_out() {
    let queue: Queue<i32> = Queue::new(4);
    let ctx = CallContext::with_timeout(Duration::from_millis(30));
    assert_eq!(queue.get(&ctx).await, Err(QueueError::DeadlineExceeded));
}

#[tokio::test]
async fn test_close_wakes_blocked_get() {
    let queue: Queue<i32> = Queue::new(4);
    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.get(&CallContext::background()).await })
    };

    sleep(Duration::from_millis(10)).await;
    queue.close();

    let result = tokio::time::timeout(Duration::from_secs(1), consumer)
        .await
        .expect("blocked get must resolve after close")
        .unwrap();
    assert_eq!(result, Err(QueueError::Closed));
}

#[tokio::test]
async fn test_close_wakes_blocked_put() {
    let queue: Queue<i32> = Queue::new(1);
    queue.put(&CallContext::background(), 1).await.unwrap();

    let producer = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.put(&CallContext::background(), 2).await })
    };

    sleep(Duration::from_millis(10)).await;
    queue.close();

    let result = tokio::time::timeout(Duration::from_secs(1), producer)
        .await
        .expect("blocked put must resolve after close")
        .unwrap();
    assert_eq!(result, Err(QueueError::Closed));
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let queue: Queue<i32> = Queue::new(4);
    queue.close();
    queue.close();
    assert!(queue.is_closed());
    assert_eq!(
        queue.put(&CallContext::background(), 1).await,
        Err(QueueError::Closed)
    );
}

#[tokio::test]
async fn test_close_keeps_buffered_items() {
    let queue: Queue<i32> = Queue::new(4);
    let ctx = CallContext::background();
    for i in 0..3 {
        queue.put(&ctx, i).await.unwrap();
    }

    queue.close();

    assert_eq!(queue.get(&ctx).await, Err(QueueError::Closed));
    assert_eq!(queue.get_non_blocking(&ctx), Err(QueueError::Closed));
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.drain().await, vec![0, 1, 2]);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_get_non_blocking_on_empty_open_queue() {
    let queue: Queue<i32> = Queue::new(4);
    let ctx = CallContext::background();

    assert_eq!(queue.get_non_blocking(&ctx), Err(QueueError::NoData));

    queue.put(&ctx, 7).await.unwrap();
    assert_eq!(queue.get_non_blocking(&ctx), Ok(7));
    assert_eq!(queue.get_non_blocking(&ctx), Err(QueueError::NoData));
}

#[tokio::test]
async fn test_get_non_blocking_respects_context() {
    let queue: Queue<i32> = Queue::new(4);
    queue.put(&CallContext::background(), 1).await.unwrap();

    let ctx = CallContext::background();
    ctx.cancel();
    assert_eq!(queue.get_non_blocking(&ctx), Err(QueueError::Cancelled));
    assert_eq!(queue.len(), 1);
}

// Both signals ready before the call: either error is acceptable.
#[tokio::test]
async fn test_closed_and_cancelled_close_first() {
    let queue: Queue<i32> = Queue::new(4);
    let ctx = CallContext::background();
    queue.close();
    ctx.cancel();

    let err = queue.get(&ctx).await.unwrap_err();
    assert!(matches!(err, QueueError::Closed | QueueError::Cancelled));
    let err = queue.put(&ctx, 1).await.unwrap_err();
    assert!(matches!(err, QueueError::Closed | QueueError::Cancelled));
}

#[tokio::test]
async fn test_closed_and_cancelled_cancel_first() {
    let queue: Queue<i32> = Queue::new(4);
    let ctx = CallContext::background();
    ctx.cancel();
    queue.close();

    let err = queue.get(&ctx).await.unwrap_err();
    assert!(matches!(err, QueueError::Closed | QueueError::Cancelled));
    let err = queue.get_non_blocking(&ctx).unwrap_err();
    assert!(matches!(err, QueueError::Closed | QueueError::Cancelled));
}

#[tokio::test]
async fn test_concurrent_producers_deliver_everything() {
    let queue: Arc<Queue<usize>> = Arc::new(Queue::new(8));
    let mut producers = Vec::new();

    for p in 0..4 {
        let queue = queue.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..25 {
                queue.put(&CallContext::background(), p * 100 + i).await.unwrap();
            }
        }));
    }

    let mut received = Vec::with_capacity(100);
    let ctx = CallContext::background();
    while received.len() < 100 {
        received.push(queue.get(&ctx).await.unwrap());
    }
    for producer in producers {
        producer.await.unwrap();
    }

    // Per-producer order survives interleaving
    for p in 0..4 {
        let own: Vec<usize> = received.iter().copied().filter(|v| v / 100 == p).collect();
        let expected: Vec<usize> = (0..25).map(|i| p * 100 + i).collect();
        assert_eq!(own, expected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_context_deadline_elapses() {
    let ctx = CallContext::with_timeout(Duration::from_millis(10));
    assert_eq!(ctx.err(), None);

    assert_eq!(ctx.done().await, QueueError::DeadlineExceeded);
    assert_eq!(ctx.err(), Some(QueueError::DeadlineExceeded));
}

#[tokio::test]
async fn test_context_cancel_beats_deadline() {
    let ctx = CallContext::with_timeout(Duration::from_secs(60));
    ctx.cancel();

    assert_eq!(ctx.err(), Some(QueueError::Cancelled));
    assert_eq!(ctx.done().await, QueueError::Cancelled);
}
