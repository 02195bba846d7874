//! # Per-subscriber delivery lanes.
//!
//! [`SubscriberSet`] gives every [`Subscribe`] implementation its own bounded
//! lane and worker, so a slow or failing subscriber never holds up the gate's
//! listener or the other subscribers.
//!
//! ```text
//!  gate listener
//!      │ emit(event)                      lane (bounded)      worker
//!      ├──────────────────────────────►  [■■□□] ──────────► on_event()
//!      ├──────────────────────────────►  [■■■■] full ──┐
//!      │                                                │ SubscriberOverflow
//!      │ next_report() ◄──── reports (unbounded) ◄──────┤
//!      │                                                │ SubscriberPanicked
//!      ▼                                  [■□□□] ──────► on_event() panics
//!  republished on the gate's event channel
//! ```
//!
//! Overflow and panic reports are not published by the set itself. The
//! listener pulls them with [`SubscriberSet::next_report`] and republishes
//! them, so they reach both subscribers and `PriorityGate::subscribe` receivers.
//!
//! A report is never reported again: an overflow report that overflows, or a
//! panic while handling a panic report, is dropped silently.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinSet};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// One subscriber's side of the fan-out.
struct Lane {
    subscriber: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Fan-out of gate events to independent subscriber workers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: JoinSet<()>,
    report_tx: mpsc::UnboundedSender<Event>,
    reports: mpsc::UnboundedReceiver<Event>,
}

impl SubscriberSet {
    /// Starts one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let (report_tx, reports) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();

        let lanes = subscribers
            .into_iter()
            .map(|sub| {
                let (queue, inbox) = mpsc::channel(sub.queue_capacity().max(1));
                let subscriber = sub.name();
                workers.spawn(drive(sub, inbox, report_tx.clone()));
                Lane { subscriber, queue }
            })
            .collect();

        Self {
            lanes,
            workers,
            report_tx,
            reports,
        }
    }

    /// Hands `event` to every lane without waiting.
    ///
    /// Returns how many subscribers had to drop it (lane full or worker gone).
    pub fn emit(&self, event: Event) -> usize {
        let reportable = event.kind != EventKind::SubscriberOverflow;
        let event = Arc::new(event);

        let mut dropped = 0;
        for lane in &self.lanes {
            let cause = match lane.queue.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            dropped += 1;
            if reportable {
                let _ = self
                    .report_tx
                    .send(Event::subscriber_overflow(lane.subscriber, cause));
            }
        }
        dropped
    }

    /// Next overflow or panic report.
    ///
    /// Pending forever while nothing goes wrong; meant to sit in a `select!`.
    pub async fn next_report(&mut self) -> Option<Event> {
        self.reports.recv().await
    }

    /// Closes every lane and waits for the workers to drain what is queued.
    pub async fn close(self) {
        let Self {
            lanes, mut workers, ..
        } = self;
        drop(lanes);
        while workers.join_next().await.is_some() {}
    }
}

/// Delivers one lane's events, surviving panics in the subscriber.
async fn drive(
    sub: Arc<dyn Subscribe>,
    mut inbox: mpsc::Receiver<Arc<Event>>,
    reports: mpsc::UnboundedSender<Event>,
) {
    while let Some(event) = inbox.recv().await {
        let delivered = AssertUnwindSafe(sub.on_event(&event)).catch_unwind().await;
        if let Err(payload) = delivered
            && event.kind != EventKind::SubscriberPanicked
        {
            let _ = reports.send(Event::subscriber_panicked(
                sub.name(),
                describe_panic(payload.as_ref()),
            ));
        }
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
