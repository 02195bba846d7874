//! Admission gates: occupancy counting, queueing and hand-off.
//!
//! The public API from this module is [`PriorityGate`], its FIFO sibling
//! [`FifoGate`], the [`GateBuilder`] that constructs both, and the
//! [`Admission`] / [`Permit`] types returned to callers.
//!
//! Internal modules:
//! - [`core`]: the gate itself; every state transition happens under its lock;
//! - [`pending`]: a queued caller's select loop (grant, cancel, timeout, aging) and drop guard;
//! - [`permit`]: RAII guards that call `finish` on drop;
//! - [`builder`]: validation, event channel and subscriber listener wiring;
//! - [`fifo`]: arrival-order gate built on the priority gate.

mod admission;
mod builder;
mod core;
mod fifo;
mod pending;
mod permit;

pub use admission::Admission;
pub use builder::GateBuilder;
pub use core::PriorityGate;
pub use fifo::FifoGate;
pub use permit::{OwnedPermit, Permit};
