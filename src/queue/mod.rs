//! Wait-list data structures.
//!
//! - [`WaitQueue`] index-aware binary heap ordered by priority, then arrival;
//! - [`WaiterKey`] handle used to remove or re-rank a queued waiter;
//! - [`Waiter`] a queued entry with its payload.
//!
//! The queue is a plain single-threaded structure. [`PriorityGate`](crate::PriorityGate)
//! serializes every access under its own mutex.

mod wait_queue;

pub use wait_queue::{WaitQueue, Waiter, WaiterKey};
