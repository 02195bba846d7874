//! # slotgate
//!
//! **Slotgate** is a priority-aware concurrency admission gate for async Rust.
//!
//! It bounds how many requests are *inside* a critical section at once. Excess
//! requests queue and are released highest priority first, earliest arrival
//! first within a priority. Queued requests can age upward, give up after a
//! timeout, or be cancelled by their caller.
//!
//! It limits concurrent occupancy, not throughput over time.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller A          caller B          caller C
//!  wait(HIGH)        wait(LOW)         wait(LOW)
//!      │                 │                 │
//!      ▼                 ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  PriorityGate                                                     │
//! │  Mutex { occupancy, WaitQueue<oneshot::Sender> }                  │
//! │   occupancy < capacity ─► occupancy += 1, Admission::Immediate    │
//! │   otherwise            ─► insert waiter, park caller              │
//! └──────┬─────────────────────────────┬──────────────────────────────┘
//!        │ finish(): occupancy -= 1    │ parked caller (select!, biased)
//!        │   pop top, occupancy += 1   │   grant   ─► Granted
//!        │   send grant ───────────────┤   cancel  ─► evict ─► Cancelled
//!        │                             │   timeout ─► evict ─► TimedOut
//!        │                             │   aging   ─► priority + 1, keep waiting
//!        ▼                             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 tokio broadcast channel of Event                  │
//! │                (capacity: GateConfig::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      worker1   worker2   workerN
//! ```
//!
//! ### Waiter lifecycle
//! ```text
//! Enqueued ──► Granted     (finish handed it a slot)
//!          ├─► TimedOut    (let through over capacity)
//!          ├─► Cancelled   (counted as inside as well)
//!          └─► Abandoned   (wait future dropped; nothing leaks)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                     |
//! |-------------------|--------------------------------------------------------------|----------------------------------------|
//! | **Gates**         | Priority and FIFO admission with aging and timeout eviction. | [`PriorityGate`], [`FifoGate`]         |
//! | **Outcomes**      | How a request got in, and RAII release.                      | [`Admission`], [`Permit`]              |
//! | **Wait list**     | Index-aware priority heap usable on its own.                 | [`WaitQueue`], [`WaiterKey`]           |
//! | **Subscriber API**| Hook into gate events (logging, metrics, custom subscribers).| [`Subscribe`], [`Event`]               |
//! | **Configuration** | Capacity, aging, timeout, priority ceiling.                  | [`GateConfig`], [`GateBuilder`]        |
//! | **Errors**        | Construction errors.                                         | [`GateError`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use slotgate::{GateConfig, Priority, PriorityGate};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = GateConfig::new(3)
//!         .with_aging(Duration::from_millis(10))
//!         .with_timeout(Duration::from_secs(2));
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn slotgate::Subscribe>> = vec![Arc::new(slotgate::LogWriter::default())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn slotgate::Subscribe>> = Vec::new();
//!
//!     let gate = PriorityGate::builder(cfg).with_subscribers(subs).build()?;
//!     let token = CancellationToken::new();
//!
//!     let answer: Result<u32, std::io::Error> = gate
//!         .run(Priority::HIGH, &token, || async { Ok(42) })
//!         .await;
//!     assert_eq!(answer?, 42);
//!     assert_eq!(gate.count(), 0);
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod gate;
mod priority;
mod queue;
mod subscribers;

// ---- Public re-exports ----

pub use config::GateConfig;
pub use error::GateError;
pub use events::{Event, EventKind};
pub use gate::{Admission, FifoGate, GateBuilder, OwnedPermit, Permit, PriorityGate};
pub use priority::Priority;
pub use queue::{WaitQueue, Waiter, WaiterKey};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
