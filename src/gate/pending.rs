//! # Suspended waiter
//!
//! A queued request parks in [`Pending::park`] until one of four things
//! happens. The loop is `biased`, so on a single wake-up the checks run in
//! this order:
//!
//! ```text
//! loop {
//!   select! (biased) {
//!     grant signal    ──► Granted               (finish already counted us)
//!     cancel token    ──► evict(Cancellation)   (Cancelled, or Granted if finish won)
//!     timeout elapsed ──► evict(Timeout)        (TimedOut,  or Granted if finish won)
//!     aging tick      ──► re-check cancel, escalate one rank
//!                          └─ at the ceiling: stop ticking
//!   }
//! }
//! ```
//!
//! ## Rules
//! - The timeout is one deadline per wait; it is not reset by aging.
//! - Aging ticks that fall behind are delayed, never bursted.
//! - If the future is dropped before the loop settles, [`Drop`] hands the
//!   situation back to the gate (`abandon`), so no slot and no queue entry leaks.

use std::future;

use tokio::{
    sync::oneshot,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::queue::WaiterKey;

use super::{
    admission::Admission,
    core::{Eviction, PriorityGate},
};

/// Drop guard for one queued request.
pub(super) struct Pending<'a> {
    gate: &'a PriorityGate,
    key: WaiterKey,
    settled: bool,
}

impl<'a> Pending<'a> {
    pub(super) fn new(gate: &'a PriorityGate, key: WaiterKey) -> Self {
        Self {
            gate,
            key,
            settled: false,
        }
    }

    /// Suspends until the request is granted, evicted, or the future is dropped.
    pub(super) async fn park(
        mut self,
        mut rx: oneshot::Receiver<()>,
        cancel: &CancellationToken,
    ) -> Admission {
        let cfg = self.gate.config();

        let limit = cfg.timeout_limit();
        let timeout = async move {
            match limit {
                Some(d) => time::sleep(d).await,
                None => future::pending::<()>().await,
            }
        };
        tokio::pin!(timeout);

        let mut aging = cfg.aging_period().map(|period| {
            let mut iv = time::interval_at(Instant::now() + period, period);
            iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
            iv
        });

        let outcome = loop {
            tokio::select! {
                biased;

                // The sender only leaves the queue through `finish`, which
                // sends first, so a closed channel is not observable here.
                _ = &mut rx => break Admission::Granted,

                _ = cancel.cancelled() => {
                    break self.gate.evict(self.key, Eviction::Cancellation);
                }

                _ = &mut timeout => {
                    break self.gate.evict(self.key, Eviction::Timeout);
                }

                _ = next_tick(&mut aging) => {
                    if cancel.is_cancelled() {
                        break self.gate.evict(self.key, Eviction::Cancellation);
                    }
                    if !self.gate.escalate(self.key) {
                        aging = None;
                    }
                }
            }
        };

        self.settled = true;
        outcome
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.abandon(self.key);
        }
    }
}

/// Next aging tick, or never if aging is off or finished.
async fn next_tick(aging: &mut Option<Interval>) {
    match aging {
        Some(iv) => {
            iv.tick().await;
        }
        None => future::pending().await,
    }
}
