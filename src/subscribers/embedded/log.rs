//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [admitted] priority=high occupancy=1 waiting=0
//! [enqueued] priority=low occupancy=3 waiting=1
//! [escalated] priority=medium waited=10ms
//! [granted] priority=medium waited=42ms occupancy=3 waiting=0
//! [timed-out] priority=low waited=100ms occupancy=4 waiting=0
//! [released] occupancy=2 waiting=0
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let priority = e.priority.map(|p| p.to_string());
        let priority = priority.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::Admitted => {
                println!(
                    "[admitted] priority={priority} occupancy={:?} waiting={:?}",
                    e.occupancy, e.waiting
                );
            }
            EventKind::Enqueued => {
                println!(
                    "[enqueued] priority={priority} occupancy={:?} waiting={:?}",
                    e.occupancy, e.waiting
                );
            }
            EventKind::Escalated => {
                println!("[escalated] priority={priority} waited={:?}ms", e.waited_ms);
            }
            EventKind::Granted => {
                println!(
                    "[granted] priority={priority} waited={:?}ms occupancy={:?} waiting={:?}",
                    e.waited_ms, e.occupancy, e.waiting
                );
            }
            EventKind::TimedOut => {
                println!(
                    "[timed-out] priority={priority} waited={:?}ms occupancy={:?} waiting={:?}",
                    e.waited_ms, e.occupancy, e.waiting
                );
            }
            EventKind::Cancelled => {
                println!(
                    "[cancelled] priority={priority} waited={:?}ms occupancy={:?} waiting={:?}",
                    e.waited_ms, e.occupancy, e.waiting
                );
            }
            EventKind::Released => {
                println!("[released] occupancy={:?} waiting={:?}", e.occupancy, e.waiting);
            }
            EventKind::Abandoned => {
                println!(
                    "[abandoned] priority={priority} reason={:?} occupancy={:?}",
                    e.reason, e.occupancy
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.source, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.source.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
