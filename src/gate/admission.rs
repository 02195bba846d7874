//! # Admission outcomes
//!
//! Every call to [`PriorityGate::wait`](crate::PriorityGate::wait) ends in
//! exactly one [`Admission`]. None of them is an error: in all four cases the
//! caller is counted as occupying a slot and must eventually call `finish`
//! (or drop its [`Permit`](crate::Permit)).
//!
//! ## Variants
//! - `Immediate`: capacity was available, no queueing.
//! - `Granted`: queued, then handed a slot released by `finish`.
//! - `TimedOut`: queued past the configured timeout; let through **over capacity**.
//! - `Cancelled`: the caller's token fired while queued; also counted as inside.
//!
//! ## Invariants
//! - A queued request ends in exactly one of `Granted`, `TimedOut`, `Cancelled`.
//! - If a grant and an eviction race, whichever reaches the gate's lock first
//!   wins; a request that was already granted reports `Granted`.

/// Outcome of waiting for admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Admitted without waiting.
    Immediate,

    /// Waited in the queue and received a released slot.
    Granted,

    /// Waited until the timeout and was let through regardless of capacity.
    ///
    /// Occupancy may exceed capacity until the matching `finish`.
    TimedOut,

    /// Stopped waiting because the caller's cancellation token fired.
    ///
    /// Still counted as occupying a slot. Callers that should not proceed
    /// after cancellation must check this and call `finish` without working.
    Cancelled,
}

impl Admission {
    /// True if the request was removed from the queue by timeout or cancellation
    /// rather than granted a slot.
    #[inline]
    pub fn is_evicted(self) -> bool {
        matches!(self, Admission::TimedOut | Admission::Cancelled)
    }

    /// True if the request had to queue.
    #[inline]
    pub fn was_queued(self) -> bool {
        !matches!(self, Admission::Immediate)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Admission::Immediate => "admission_immediate",
            Admission::Granted => "admission_granted",
            Admission::TimedOut => "admission_timed_out",
            Admission::Cancelled => "admission_cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eviction_classification() {
        assert!(!Admission::Immediate.is_evicted());
        assert!(!Admission::Granted.is_evicted());
        assert!(Admission::TimedOut.is_evicted());
        assert!(Admission::Cancelled.is_evicted());
        assert!(!Admission::Immediate.was_queued());
        assert!(Admission::Granted.was_queued());
    }
}
