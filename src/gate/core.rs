use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    config::GateConfig,
    error::GateError,
    events::{Event, EventKind},
    priority::Priority,
    queue::{WaitQueue, WaiterKey},
};

use super::{
    admission::Admission,
    builder::GateBuilder,
    pending::Pending,
    permit::{OwnedPermit, Permit},
};

/// Occupancy and wait list, always locked together.
struct State {
    occupancy: usize,
    queue: WaitQueue<oneshot::Sender<()>>,
}

/// Result of the admission fast path.
enum Entry {
    Admitted,
    Queued {
        key: WaiterKey,
        rx: oneshot::Receiver<()>,
    },
}

/// Why a queued waiter left the queue on its own.
#[derive(Clone, Copy, Debug)]
pub(super) enum Eviction {
    Timeout,
    Cancellation,
}

impl Eviction {
    fn admission(self) -> Admission {
        match self {
            Eviction::Timeout => Admission::TimedOut,
            Eviction::Cancellation => Admission::Cancelled,
        }
    }

    fn kind(self) -> EventKind {
        match self {
            Eviction::Timeout => EventKind::TimedOut,
            Eviction::Cancellation => EventKind::Cancelled,
        }
    }
}

/// Concurrency admission gate with a priority-ordered wait list.
///
/// At most `capacity` requests are inside at once (see [`Admission`] for the
/// soft-limit exceptions). Excess requests queue and are released highest
/// priority first, earliest arrival first within a priority.
///
/// ### Rules
/// - One mutex guards occupancy and the queue; it is never held across `.await`
/// - `finish` signals the next waiter while holding the lock (a oneshot send never blocks)
/// - Aging and timeout timers belong to each suspended `wait` call, not to a background task
/// - Events are published after the lock is released
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use slotgate::{Admission, GateConfig, Priority, PriorityGate};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gate = PriorityGate::new(GateConfig::new(2).with_timeout(Duration::from_secs(1)))?;
///     let token = CancellationToken::new();
///
///     assert_eq!(gate.wait(Priority::HIGH, &token).await, Admission::Immediate);
///     assert_eq!(gate.count(), 1);
///     gate.finish();
///
///     let out: Result<u32, std::io::Error> = gate
///         .run(Priority::LOW, &token, || async { Ok(7) })
///         .await;
///     assert_eq!(out?, 7);
///     assert_eq!(gate.count(), 0);
///     Ok(())
/// }
/// ```
pub struct PriorityGate {
    cfg: GateConfig,
    state: Mutex<State>,
    events: broadcast::Sender<Event>,
    /// Stops the subscriber listener when the gate goes away.
    shutdown: CancellationToken,
}

impl PriorityGate {
    /// Creates a gate without subscribers.
    ///
    /// Fails with [`GateError::ZeroCapacity`] if `cfg.capacity == 0`.
    pub fn new(cfg: GateConfig) -> Result<Arc<Self>, GateError> {
        GateBuilder::new(cfg).build()
    }

    /// Returns a builder for attaching subscribers.
    pub fn builder(cfg: GateConfig) -> GateBuilder {
        GateBuilder::new(cfg)
    }

    pub(super) fn from_parts(
        cfg: GateConfig,
        events: broadcast::Sender<Event>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            state: Mutex::new(State {
                occupancy: 0,
                queue: WaitQueue::new(),
            }),
            events,
            shutdown,
        }
    }

    /// Waits for admission.
    ///
    /// Returns immediately if a slot is free. Otherwise the request queues
    /// with `priority` and the call suspends until it is granted a slot, its
    /// timeout elapses, or `cancel` fires. While queued with aging enabled the
    /// request's priority rises one rank per aging interval, up to
    /// `max_priority`.
    ///
    /// ### Cancellation semantics
    /// - `cancel` firing while queued removes the request and returns
    ///   [`Admission::Cancelled`]; the caller is still counted as inside.
    /// - If a grant wins the race with cancellation, [`Admission::Granted`] is returned.
    /// - Dropping the returned future while queued withdraws the request; a
    ///   grant that already reached it is passed on to the next waiter.
    ///
    /// Every outcome must be matched by one [`finish`](Self::finish).
    pub async fn wait(&self, priority: Priority, cancel: &CancellationToken) -> Admission {
        match self.admit_or_enqueue(priority) {
            Entry::Admitted => Admission::Immediate,
            Entry::Queued { key, rx } => Pending::new(self, key).park(rx, cancel).await,
        }
    }

    /// Releases one slot and hands it to the highest-priority waiter, if any.
    ///
    /// Calling `finish` with nothing inside leaves occupancy at zero.
    pub fn finish(&self) {
        let (released, granted) = {
            let mut st = self.state.lock();
            st.occupancy = st.occupancy.saturating_sub(1);
            let released =
                Event::new(EventKind::Released).with_occupancy(st.occupancy, st.queue.len());
            (released, Self::hand_off(&mut st))
        };

        self.publish(released);
        if let Some(ev) = granted {
            self.publish(ev);
        }
    }

    /// Waits for admission, runs `task`, then releases the slot.
    ///
    /// The slot is released on every exit path: success, error, panic, or the
    /// returned future being dropped. The task's result is returned unchanged.
    ///
    /// A cancelled wait still runs `task`; use [`acquire`](Self::acquire) and
    /// inspect [`Permit::admission`] to skip work after cancellation.
    pub async fn run<F, Fut, T, E>(
        &self,
        priority: Priority,
        cancel: &CancellationToken,
        task: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let _permit = self.acquire(priority, cancel).await;
        task().await
    }

    /// Waits for admission and returns a guard that calls `finish` on drop.
    pub async fn acquire(&self, priority: Priority, cancel: &CancellationToken) -> Permit<'_> {
        let admission = self.wait(priority, cancel).await;
        Permit::new(self, admission)
    }

    /// Like [`acquire`](Self::acquire), but the guard owns an `Arc` to the gate
    /// and can move into spawned tasks.
    pub async fn acquire_owned(
        self: Arc<Self>,
        priority: Priority,
        cancel: &CancellationToken,
    ) -> OwnedPermit {
        let admission = self.wait(priority, cancel).await;
        OwnedPermit::new(self, admission)
    }

    /// Current number of requests inside.
    pub fn count(&self) -> usize {
        self.state.lock().occupancy
    }

    /// Current number of queued requests.
    pub fn waiting(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Priorities of queued requests, in the order they would be released.
    pub fn queued_priorities(&self) -> Vec<Priority> {
        self.state.lock().queue.priorities()
    }

    /// Maximum concurrent admissions.
    pub fn capacity(&self) -> usize {
        self.cfg.capacity
    }

    /// Configuration this gate was built with.
    pub fn config(&self) -> &GateConfig {
        &self.cfg
    }

    /// Creates a receiver for this gate's events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    // ---------------------------
    // Transitions (all under the lock)
    // ---------------------------

    /// Sends to current receivers; with none, the event is dropped.
    fn publish(&self, ev: Event) {
        let _ = self.events.send(ev);
    }

    fn admit_or_enqueue(&self, priority: Priority) -> Entry {
        let (entry, event) = {
            let mut st = self.state.lock();
            if st.occupancy < self.cfg.capacity {
                st.occupancy += 1;
                let ev = Event::new(EventKind::Admitted)
                    .with_priority(priority)
                    .with_occupancy(st.occupancy, st.queue.len());
                (Entry::Admitted, ev)
            } else {
                let (tx, rx) = oneshot::channel();
                let key = st.queue.insert(priority, tx);
                let ev = Event::new(EventKind::Enqueued)
                    .with_priority(priority)
                    .with_occupancy(st.occupancy, st.queue.len());
                (Entry::Queued { key, rx }, ev)
            }
        };

        self.publish(event);
        entry
    }

    /// Raises a queued waiter by one rank.
    ///
    /// Returns `false` once the waiter is gone or already at the ceiling.
    pub(super) fn escalate(&self, key: WaiterKey) -> bool {
        let ceiling = self.cfg.max_priority;
        let event = {
            let mut st = self.state.lock();
            let Some(waiter) = st.queue.get(key) else {
                return false;
            };
            let current = waiter.priority();
            let next = current.escalate(ceiling);
            if next == current {
                return false;
            }
            let waited = waiter.enqueued_at().elapsed();
            st.queue.update_priority(key, next);

            Event::new(EventKind::Escalated)
                .with_priority(next)
                .with_waited(waited)
        };

        self.publish(event);
        true
    }

    /// Removes a waiter that stopped waiting and counts it as inside.
    ///
    /// If `finish` already extracted it, the grant stands.
    pub(super) fn evict(&self, key: WaiterKey, why: Eviction) -> Admission {
        let event = {
            let mut st = self.state.lock();
            let Some(waiter) = st.queue.remove(key) else {
                return Admission::Granted;
            };
            st.occupancy += 1;

            Event::new(why.kind())
                .with_priority(waiter.priority())
                .with_waited(waiter.enqueued_at().elapsed())
                .with_occupancy(st.occupancy, st.queue.len())
        };

        self.publish(event);
        why.admission()
    }

    /// Settles a waiter whose `wait` future was dropped before completing.
    ///
    /// - still queued → removed, occupancy untouched
    /// - already granted → its slot is released and handed on
    pub(super) fn abandon(&self, key: WaiterKey) {
        let (abandoned, granted) = {
            let mut st = self.state.lock();
            match st.queue.remove(key) {
                Some(waiter) => {
                    let ev = Event::new(EventKind::Abandoned)
                        .with_priority(waiter.priority())
                        .with_waited(waiter.enqueued_at().elapsed())
                        .with_reason("withdrawn")
                        .with_occupancy(st.occupancy, st.queue.len());
                    (ev, None)
                }
                None => {
                    st.occupancy = st.occupancy.saturating_sub(1);
                    let ev = Event::new(EventKind::Abandoned)
                        .with_reason("grant_returned")
                        .with_occupancy(st.occupancy, st.queue.len());
                    (ev, Self::hand_off(&mut st))
                }
            }
        };

        self.publish(abandoned);
        if let Some(ev) = granted {
            self.publish(ev);
        }
    }

    /// Pops the top waiter, counts it as inside and signals it.
    fn hand_off(st: &mut State) -> Option<Event> {
        let waiter = st.queue.pop()?;
        st.occupancy += 1;

        let priority = waiter.priority();
        let waited = waiter.enqueued_at().elapsed();
        // A closed receiver means the waiter was dropped mid-flight; its
        // guard sees the missing queue entry and returns the slot.
        let _ = waiter.into_payload().send(());

        Some(
            Event::new(EventKind::Granted)
                .with_priority(priority)
                .with_waited(waited)
                .with_occupancy(st.occupancy, st.queue.len()),
        )
    }
}

impl Drop for PriorityGate {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
