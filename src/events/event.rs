//! # Admission events emitted by the gate.
//!
//! The [`EventKind`] enum classifies events in three groups:
//! - **Admission events**: how a request got in (admitted, granted, evicted)
//! - **Queue events**: enqueue, escalation, release, abandonment
//! - **Subscriber events**: overflow and panic reports from subscriber workers
//!
//! The [`Event`] struct carries optional metadata: priority, time spent
//! queued, and the gate's occupancy / queue length right after the transition.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore order when events arrive out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use slotgate::{Event, EventKind, Priority};
//!
//! let ev = Event::new(EventKind::TimedOut)
//!     .with_priority(Priority::LOW)
//!     .with_waited(Duration::from_millis(250))
//!     .with_occupancy(4, 1);
//!
//! assert_eq!(ev.kind, EventKind::TimedOut);
//! assert_eq!(ev.waited_ms, Some(250));
//! assert_eq!(ev.occupancy, Some(4));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::priority::Priority;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of gate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission events ===
    /// Request admitted without queueing.
    ///
    /// Sets: `priority`, `occupancy`, `waiting`
    Admitted,

    /// Queued request received a freed slot from `finish`.
    ///
    /// Sets: `priority` (at grant time), `waited_ms`, `occupancy`, `waiting`
    Granted,

    /// Queued request hit its wait timeout and was let through over capacity.
    ///
    /// Sets: `priority`, `waited_ms`, `occupancy`, `waiting`
    TimedOut,

    /// Queued request observed caller cancellation and left the queue.
    ///
    /// Sets: `priority`, `waited_ms`, `occupancy`, `waiting`
    Cancelled,

    // === Queue events ===
    /// Request could not be admitted and joined the wait queue.
    ///
    /// Sets: `priority`, `occupancy`, `waiting`
    Enqueued,

    /// Aging raised a queued request's priority by one rank.
    ///
    /// Sets: `priority` (new rank), `waited_ms`
    Escalated,

    /// A slot was released by `finish`.
    ///
    /// Sets: `occupancy`, `waiting` (before the freed slot is handed on)
    Released,

    /// A suspended `wait` was dropped before it completed.
    ///
    /// Sets: `occupancy`, `waiting`, `reason` (`"withdrawn"` if still queued,
    /// `"grant_returned"` if a grant had already been delivered and was passed on).
    /// `priority` and `waited_ms` are set only for `"withdrawn"`.
    Abandoned,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `source` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `source` (subscriber name), `reason` (panic message)
    SubscriberPanicked,
}

/// Gate event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Priority of the request the event is about.
    pub priority: Option<Priority>,
    /// Time spent queued in milliseconds (compact).
    pub waited_ms: Option<u32>,
    /// Gate occupancy right after the transition.
    pub occupancy: Option<usize>,
    /// Queue length right after the transition.
    pub waiting: Option<usize>,
    /// Name of the component that reported the event (subscriber events).
    pub source: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            priority: None,
            waited_ms: None,
            occupancy: None,
            waiting: None,
            source: None,
            reason: None,
        }
    }

    /// Attaches a priority.
    #[inline]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches the time spent queued (stored as milliseconds).
    #[inline]
    pub fn with_waited(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.waited_ms = Some(ms);
        self
    }

    /// Attaches the gate's occupancy and queue length.
    #[inline]
    pub fn with_occupancy(mut self, occupancy: usize, waiting: usize) -> Self {
        self.occupancy = Some(occupancy);
        self.waiting = Some(waiting);
        self
    }

    /// Attaches the reporting component's name.
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_source(subscriber)
            .with_reason(info)
    }

    /// True for events that describe an eviction (timeout or cancellation).
    #[inline]
    pub fn is_eviction(&self) -> bool {
        matches!(self.kind, EventKind::TimedOut | EventKind::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Enqueued);
        let b = Event::new(EventKind::Granted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_waited_saturates() {
        let ev = Event::new(EventKind::Granted).with_waited(Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.waited_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_overflow_carries_name() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.source.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
        assert!(!ev.is_eviction());
    }
}
