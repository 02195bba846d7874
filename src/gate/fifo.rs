//! # FIFO gate
//!
//! [`FifoGate`] follows the same admission and release protocol as
//! [`PriorityGate`], but every request queues at one fixed rank, so the
//! arrival tie-break alone decides who is released next. Aging has nothing to
//! act on and is rejected at construction; timeouts behave identically.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{config::GateConfig, error::GateError, events::Event, priority::Priority};

use super::{
    admission::Admission,
    builder::GateBuilder,
    core::PriorityGate,
    permit::{OwnedPermit, Permit},
};

/// Rank every FIFO request queues at.
const RANK: Priority = Priority::LOW;

/// Concurrency gate that releases waiters in arrival order.
///
/// Cheap to clone; clones share the same slots and queue.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use slotgate::{FifoGate, GateConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gate = FifoGate::new(GateConfig::new(1))?;
///     let token = CancellationToken::new();
///
///     let permit = gate.acquire(&token).await;
///     assert_eq!(gate.count(), 1);
///     drop(permit);
///     assert_eq!(gate.count(), 0);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct FifoGate {
    inner: Arc<PriorityGate>,
}

impl FifoGate {
    /// Creates a FIFO gate without subscribers.
    ///
    /// Fails with [`GateError::ZeroCapacity`] or [`GateError::AgingUnsupported`].
    pub fn new(cfg: GateConfig) -> Result<Self, GateError> {
        GateBuilder::new(cfg).build_fifo()
    }

    pub(super) fn from_gate(inner: Arc<PriorityGate>) -> Self {
        Self { inner }
    }

    /// Waits for admission in arrival order. See [`PriorityGate::wait`].
    pub async fn wait(&self, cancel: &CancellationToken) -> Admission {
        self.inner.wait(RANK, cancel).await
    }

    /// Releases one slot and hands it to the longest waiter, if any.
    pub fn finish(&self) {
        self.inner.finish();
    }

    /// Waits, runs `task`, then releases the slot. See [`PriorityGate::run`].
    pub async fn run<F, Fut, T, E>(&self, cancel: &CancellationToken, task: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.inner.run(RANK, cancel, task).await
    }

    /// Waits and returns a guard that releases the slot on drop.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Permit<'_> {
        self.inner.acquire(RANK, cancel).await
    }

    /// Waits and returns a guard that can move into spawned tasks.
    pub async fn acquire_owned(&self, cancel: &CancellationToken) -> OwnedPermit {
        Arc::clone(&self.inner).acquire_owned(RANK, cancel).await
    }

    /// Current number of requests inside.
    pub fn count(&self) -> usize {
        self.inner.count()
    }

    /// Current number of queued requests.
    pub fn waiting(&self) -> usize {
        self.inner.waiting()
    }

    /// Maximum concurrent admissions.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Creates a receiver for this gate's events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.subscribe()
    }
}
