//! Gate events.
//!
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `PriorityGate` (`wait`, `finish`, evictions, dropped
//!   waits) through its `tokio::sync::broadcast` channel; the subscriber
//!   listener republishes overflow/panic reports from `SubscriberSet`.
//! - **Consumers**: the gate's subscriber listener (fans out to
//!   `SubscriberSet`) and any receiver from `PriorityGate::subscribe()`.
//! - **No persistence**: an event sent while nobody listens is gone; a
//!   receiver that falls more than `GateConfig::bus_capacity` events behind
//!   observes `Lagged` and skips the oldest ones.

mod event;

pub use event::{Event, EventKind};
