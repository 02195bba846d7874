//! # Example: FIFO Gate
//!
//! Fifteen tasks share three slots and are admitted in arrival order.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use slotgate::{FifoGate, GateConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let gate = FifoGate::new(GateConfig::new(3))?;
    let token = CancellationToken::new();

    let mut handles = Vec::with_capacity(15);
    for index in 0..15 {
        let gate = gate.clone();
        let token = token.clone();

        handles.push(tokio::spawn(async move {
            let permit = gate.acquire(&token).await;
            println!(
                "executing action... index={index} admission={} inside={}",
                permit.admission().as_label(),
                gate.count()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }));
    }

    for h in handles {
        h.await?;
    }
    println!("all done, inside={}", gate.count());
    Ok(())
}
