//! # Example: Priority Gate
//!
//! Fifteen tasks contend for a single slot. Odd-numbered tasks ask for
//! `HIGH`, even-numbered ones for `LOW`; once the first holder finishes, the
//! queued `HIGH` requests are served before any `LOW` one.
//!
//! Run with `cargo run --example priority --features logging` to also see the
//! gate's own events.

use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

use slotgate::{GateConfig, Priority, PriorityGate, Subscribe};

fn subscribers() -> Vec<Arc<dyn Subscribe>> {
    #[cfg(feature = "logging")]
    {
        vec![Arc::new(slotgate::LogWriter::new())]
    }
    #[cfg(not(feature = "logging"))]
    {
        Vec::new()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = GateConfig::new(1).with_aging(Duration::from_millis(20));
    let gate = PriorityGate::builder(cfg)
        .with_subscribers(subscribers())
        .build()?;
    let token = CancellationToken::new();

    let mut handles = Vec::with_capacity(15);
    for index in 0..15 {
        let gate = Arc::clone(&gate);
        let token = token.clone();
        let priority = if index % 2 == 1 {
            Priority::HIGH
        } else {
            Priority::LOW
        };

        handles.push(tokio::spawn(async move {
            let observer = Arc::clone(&gate);
            gate.run(priority, &token, move || async move {
                println!(
                    "executing action... index={index} priority={priority} inside={}",
                    observer.count()
                );
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok::<(), anyhow::Error>(())
            })
            .await
        }));
    }

    for h in handles {
        h.await??;
    }
    println!("all done, inside={}", gate.count());
    Ok(())
}
