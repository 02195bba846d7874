//! Error types used by the gate.
//!
//! Admission itself never fails: a `wait` ends in one of the
//! [`Admission`](crate::Admission) outcomes. The only errors are configuration
//! mistakes caught when a gate is built, reported as [`GateError`].
//!
//! Like the other runtime errors it provides `as_label` / `as_message` helpers
//! for logs and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while constructing a gate.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Capacity must allow at least one concurrent admission.
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    /// The FIFO gate orders strictly by arrival and cannot age priorities.
    #[error("aging interval {interval:?} is not supported by a FIFO gate")]
    AgingUnsupported {
        /// The aging interval that was configured.
        interval: Duration,
    },
}

impl GateError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use slotgate::GateError;
    ///
    /// assert_eq!(GateError::ZeroCapacity.as_label(), "gate_zero_capacity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GateError::ZeroCapacity => "gate_zero_capacity",
            GateError::AgingUnsupported { .. } => "gate_aging_unsupported",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            GateError::ZeroCapacity => "capacity=0; at least one slot required".to_string(),
            GateError::AgingUnsupported { interval } => {
                format!("fifo gate configured with aging interval={interval:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(GateError::ZeroCapacity.as_label(), "gate_zero_capacity");
        let err = GateError::AgingUnsupported {
            interval: Duration::from_millis(10),
        };
        assert_eq!(err.as_label(), "gate_aging_unsupported");
        assert!(err.as_message().contains("10ms"));
        assert!(err.to_string().contains("FIFO"));
    }
}
