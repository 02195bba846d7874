//! # Event subscribers for the gate.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and built-in implementations for handling the events a gate broadcasts.
//!
//! ## Architecture
//! ```text
//! PriorityGate ── send(Event) ──► broadcast ──► gate listener ──► SubscriberSet::emit
//!                                                                  │
//!                                                  ┌───────────────┼───────────────┐
//!                                                  ▼               ▼               ▼
//!                                              LogWriter        Metrics         Custom
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
