//! Single-item dispatch example.
//!
//! Run with: cargo run --example simple_worker

use batch_worker::queue::CallContext;
use batch_worker::worker::{ConfigBuilder, HandlerError, Payload, TracingLogger, Worker};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = ConfigBuilder::default()
        .thread_num(4usize)
        .chan_size(16usize)
        .build()?;

    let worker = Arc::new(
        Worker::<String>::builder()
            .config(config)
            .handler(|payload: Payload<String>| async move {
                if let Payload::Item(line) = payload {
                    println!("handled {line}");
                }
                Ok::<(), HandlerError>(())
            })
            .logger(Arc::new(TracingLogger))
            .build()?,
    );

    let producer = {
        let worker = worker.clone();
        tokio::spawn(async move {
            let ctx = CallContext::background();
            for i in 0..20 {
                let _ = worker.put(&ctx, format!("job-{i}")).await;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
            worker.close();
        })
    };

    worker.run().await?;
    producer.await?;
    Ok(())
}
