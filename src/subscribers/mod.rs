//! # Event subscribers for the run group.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in `LogWriter` (feature `logging`, on by default).
//!
//! ## Architecture
//! ```text
//! Group coordinator ── emit(Event) ──► SubscriberSet
//!                                           │
//!                                 ┌─────────┼─────────┐
//!                                 ▼         ▼         ▼
//!                             LogWriter   Custom     ...
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
