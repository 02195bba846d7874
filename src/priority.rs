//! # Priority ranks for queued requests.
//!
//! [`Priority`] is a thin newtype over `i32`: a **greater** value means a
//! **higher** priority. Any integer is accepted; four named ranks cover the
//! common cases:
//!
//! | Rank                      | Value |
//! |---------------------------|-------|
//! | [`Priority::LOW`]         | 1     |
//! | [`Priority::MEDIUM`]      | 2     |
//! | [`Priority::MEDIUM_HIGH`] | 3     |
//! | [`Priority::HIGH`]        | 4     |
//!
//! ## Escalation
//! Aging raises a waiter's rank one step at a time via [`Priority::escalate`],
//! never past the configured ceiling. A rank that already sits at or above the
//! ceiling is left untouched (aging never lowers a priority).
//!
//! ```rust
//! use slotgate::Priority;
//!
//! assert!(Priority::HIGH > Priority::LOW);
//! assert_eq!(Priority::LOW.escalate(Priority::HIGH), Priority::MEDIUM);
//! assert_eq!(Priority::HIGH.escalate(Priority::HIGH), Priority::HIGH);
//! assert_eq!(Priority::new(9).escalate(Priority::HIGH), Priority::new(9));
//! ```

use std::fmt;

/// Rank of a request waiting for admission (greater = served earlier).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i32);

impl Priority {
    /// Lowest named rank.
    pub const LOW: Priority = Priority(1);
    /// Default rank for ordinary work.
    pub const MEDIUM: Priority = Priority(2);
    /// Above ordinary work, below urgent work.
    pub const MEDIUM_HIGH: Priority = Priority(3);
    /// Highest named rank; the default aging ceiling.
    pub const HIGH: Priority = Priority(4);

    /// Wraps a raw rank.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw rank.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns the next rank up, saturating at `ceiling`.
    ///
    /// If `self` is already `>= ceiling` it is returned unchanged.
    #[inline]
    #[must_use]
    pub fn escalate(self, ceiling: Priority) -> Priority {
        if self >= ceiling {
            return self;
        }
        Priority(self.0.saturating_add(1)).min(ceiling)
    }
}

impl Default for Priority {
    /// Returns [`Priority::LOW`].
    fn default() -> Self {
        Priority::LOW
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority(value)
    }
}

impl From<Priority> for i32 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::LOW => f.write_str("low"),
            Priority::MEDIUM => f.write_str("medium"),
            Priority::MEDIUM_HIGH => f.write_str("medium-high"),
            Priority::HIGH => f.write_str("high"),
            Priority(other) => write!(f, "{other}"),
        }
    }
}
