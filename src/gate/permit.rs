//! # Slot guards
//!
//! [`Permit`] and [`OwnedPermit`] call [`PriorityGate::finish`] exactly once
//! when dropped, so a slot is returned even if the holder errors or panics.

use std::sync::Arc;

use super::{admission::Admission, core::PriorityGate};

/// Borrowed slot guard returned by [`PriorityGate::acquire`].
#[must_use = "dropping the permit releases the slot immediately"]
pub struct Permit<'a> {
    gate: &'a PriorityGate,
    admission: Admission,
}

impl<'a> Permit<'a> {
    pub(super) fn new(gate: &'a PriorityGate, admission: Admission) -> Self {
        Self { gate, admission }
    }

    /// How this slot was obtained.
    pub fn admission(&self) -> Admission {
        self.admission
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.finish();
    }
}

impl std::fmt::Debug for Permit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Permit")
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}

/// Owned slot guard returned by [`PriorityGate::acquire_owned`].
#[must_use = "dropping the permit releases the slot immediately"]
pub struct OwnedPermit {
    gate: Arc<PriorityGate>,
    admission: Admission,
}

impl OwnedPermit {
    pub(super) fn new(gate: Arc<PriorityGate>, admission: Admission) -> Self {
        Self { gate, admission }
    }

    /// How this slot was obtained.
    pub fn admission(&self) -> Admission {
        self.admission
    }

    /// The gate this slot belongs to.
    pub fn gate(&self) -> &Arc<PriorityGate> {
        &self.gate
    }
}

impl Drop for OwnedPermit {
    fn drop(&mut self) {
        self.gate.finish();
    }
}

impl std::fmt::Debug for OwnedPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedPermit")
            .field("admission", &self.admission)
            .finish_non_exhaustive()
    }
}
