//! # Gate configuration.
//!
//! Provides [`GateConfig`], the settings fixed for a gate's lifetime.
//!
//! ## Sentinel values
//! - `aging_interval = 0s` → no aging (priorities never change while queued)
//! - `timeout = 0s` → no timeout (waiters stay queued until granted or cancelled)
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use slotgate::{GateConfig, Priority};
//!
//! let cfg = GateConfig::new(3)
//!     .with_aging(Duration::from_millis(10))
//!     .with_timeout(Duration::from_millis(500));
//!
//! assert_eq!(cfg.aging_period(), Some(Duration::from_millis(10)));
//! assert_eq!(cfg.max_priority, Priority::HIGH);
//! assert!(cfg.validate().is_ok());
//! ```

use std::time::Duration;

use crate::{error::GateError, priority::Priority};

/// Configuration for a [`PriorityGate`](crate::PriorityGate).
///
/// ## Field semantics
/// - `capacity`: maximum concurrent admissions (must be `> 0`)
/// - `aging_interval`: period of per-waiter priority escalation (`0s` = off)
/// - `timeout`: maximum time a waiter stays queued (`0s` = off)
/// - `max_priority`: ceiling for aging
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
///
/// ## Notes
/// All fields are public. Prefer the accessors to avoid sprinkling sentinel
/// checks (`0s`) around.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// Maximum number of requests admitted at once.
    pub capacity: usize,

    /// How often a queued request raises its own priority by one rank.
    ///
    /// - `Duration::ZERO` = aging disabled
    /// - `> 0` = each waiter owns an interval timer with this period
    pub aging_interval: Duration,

    /// How long a request may stay queued before it is let through anyway.
    ///
    /// - `Duration::ZERO` = wait until granted or cancelled
    /// - `> 0` = on expiry the waiter is evicted and **admitted over capacity**
    ///
    /// Callers that rely on a hard capacity must leave this at zero.
    pub timeout: Duration,

    /// Rank at which aging stops.
    pub max_priority: Priority,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl GateConfig {
    /// Creates a config with the given capacity and default policies.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Returns a config with aging enabled at the given period.
    #[must_use]
    pub fn with_aging(mut self, interval: Duration) -> Self {
        self.aging_interval = interval;
        self
    }

    /// Returns a config with timeout eviction after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a config with a different aging ceiling.
    #[must_use]
    pub fn with_max_priority(mut self, max: Priority) -> Self {
        self.max_priority = max;
        self
    }

    /// Returns the aging period as an `Option`.
    ///
    /// - `None` → aging disabled
    /// - `Some(d)` → escalate every `d`
    #[inline]
    pub fn aging_period(&self) -> Option<Duration> {
        if self.aging_interval == Duration::ZERO {
            None
        } else {
            Some(self.aging_interval)
        }
    }

    /// Returns the wait timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → evict after `d`
    #[inline]
    pub fn timeout_limit(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Rejects configurations that cannot describe a working gate.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.capacity == 0 {
            return Err(GateError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for GateConfig {
    /// Default configuration:
    ///
    /// - `capacity = 1`
    /// - `aging_interval = 0s` (no aging)
    /// - `timeout = 0s` (no timeout)
    /// - `max_priority = Priority::HIGH`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            capacity: 1,
            aging_interval: Duration::ZERO,
            timeout: Duration::ZERO,
            max_priority: Priority::HIGH,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_durations_disable_policies() {
        let cfg = GateConfig::new(4);
        assert_eq!(cfg.aging_period(), None);
        assert_eq!(cfg.timeout_limit(), None);
    }

    #[test]
    fn test_policies_round_trip_through_accessors() {
        let cfg = GateConfig::new(4)
            .with_aging(Duration::from_millis(5))
            .with_timeout(Duration::from_secs(1))
            .with_max_priority(Priority::new(10));
        assert_eq!(cfg.aging_period(), Some(Duration::from_millis(5)));
        assert_eq!(cfg.timeout_limit(), Some(Duration::from_secs(1)));
        assert_eq!(cfg.max_priority, Priority::new(10));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(GateConfig::new(0).validate(), Err(GateError::ZeroCapacity));
        assert!(GateConfig::new(1).validate().is_ok());
    }

    #[test]
    fn test_bus_capacity_is_clamped() {
        let mut cfg = GateConfig::default();
        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
