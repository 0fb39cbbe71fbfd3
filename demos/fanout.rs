//! Fan-out demo: one producer, several consumers at different speeds
//!
//! Run with: cargo run --example fanout [CAPACITY] [FRAMES]
//!
//! Examples:
//!   cargo run --example fanout              # capacity 8, 200 frames
//!   cargo run --example fanout 3 1000       # modulo ring, 1000 frames
//!   RUST_LOG=fanout_hub=trace cargo run --example fanout
//!
//! The hub itself never waits. This demo plays the role of the scheduler that
//! sits on top of it: the producer retries when `publish` reports a full hub,
//! consumers back off when `poll_up_to` comes back empty.
//!
//! A second, sliding hub shows the drop-oldest policy: its slow consumer
//! misses frames instead of holding back the producer.

use std::time::Duration;

use bytes::Bytes;
use fanout_hub::{Hub, HubConfig, Subscription};

/// Frame payload; `Bytes` clones share one allocation across subscribers
fn frame(seq: u32) -> Bytes {
    Bytes::from(format!("frame-{:05}", seq))
}

async fn consume(name: &'static str, mut sub: Subscription<Bytes>, frames: u32, delay: Duration) {
    let Some(last_seq) = frames.checked_sub(1) else {
        return;
    };
    let done = frame(last_seq);
    let mut received = 0u32;
    let mut last = None;

    loop {
        let batch = sub.poll_up_to(32);
        if batch.is_empty() {
            if last.as_ref() == Some(&done) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
            continue;
        }

        received += batch.len() as u32;
        last = batch.last().cloned();
        tokio::time::sleep(delay).await;
    }

    tracing::info!(consumer = name, received, "Consumer finished");
    println!("{:>6}: received {:>5} of {} frames", name, received, frames);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let capacity: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 8,
    };
    let frames: u32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 200,
    };
    if frames == 0 {
        return Err("FRAMES must be positive".into());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fanout_hub=debug".parse()?)
                .add_directive("fanout=info".parse()?),
        )
        .init();

    // Back-pressured hub: every consumer sees every frame
    let hub = Hub::bounded(capacity)?;
    let consumers = vec![
        tokio::spawn(consume("fast", hub.subscribe(), frames, Duration::ZERO)),
        tokio::spawn(consume(
            "slow",
            hub.subscribe(),
            frames,
            Duration::from_millis(2),
        )),
    ];

    // Sliding hub: the slow consumer loses old frames instead
    let sliding = Hub::with_config(HubConfig::bounded(capacity).sliding())?;
    let lossy = tokio::spawn(consume(
        "lossy",
        sliding.subscribe(),
        frames,
        Duration::from_millis(2),
    ));

    let mut retries = 0u64;
    for seq in 0..frames {
        let payload = frame(seq);
        while !hub.publish(payload.clone()) {
            retries += 1;
            tokio::task::yield_now().await;
        }
        sliding.offer(payload);
    }

    for consumer in consumers {
        consumer.await?;
    }
    lossy.await?;

    println!();
    println!("producer retries on full hub: {}", retries);
    println!("back-pressured: {:?}", hub.stats());
    println!("sliding:        {:?}", sliding.stats());

    Ok(())
}
