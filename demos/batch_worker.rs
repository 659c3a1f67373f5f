//! Batched dispatch example: items are grouped by count or wait time.
//!
//! Run with: cargo run --example batch_worker

use batch_worker::queue::CallContext;
use batch_worker::worker::{ConfigBuilder, HandlerError, Payload, TracingLogger, Worker};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = ConfigBuilder::default()
        .thread_num(2usize)
        .chan_size(64usize)
        .max_batch_num(10usize)
        .max_wait_interval(Duration::from_millis(500))
        .report_interval(Duration::from_secs(1))
        .build()?;

    let worker = Arc::new(Worker::<u32>::with_logger(
        config,
        |payload: Payload<u32>| async move {
            let items = payload.into_vec();
            println!("Processing batch of {} items: {:?}", items.len(), items);
            // Simulate some work
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<(), HandlerError>(())
        },
        Some(Arc::new(TracingLogger)),
    )?);

    println!("Starting batch worker...");
    println!("- Batch size: 10");
    println!("- Workers: 2");
    println!("- Processing 35 items\n");

    // Producer: 35 items, the last 5 flushed by the wait interval
    let producer = {
        let worker = worker.clone();
        tokio::spawn(async move {
            let ctx = CallContext::with_timeout(Duration::from_secs(5));
            for i in 0..35 {
                if let Err(e) = worker.put(&ctx, i).await {
                    eprintln!("Failed to put item {}: {}", i, e);
                    break;
                }
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
            worker.close();
        })
    };

    worker.run_batch().await?;
    producer.await?;

    println!("\nBatch worker completed!");
    Ok(())
}
