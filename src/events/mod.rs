//! Group events.
//!
//! The [`Group`](crate::Group) publishes an [`Event`] at every lifecycle step
//! and hands it to its [`SubscriberSet`](crate::SubscriberSet), which fans it
//! out to subscribers without awaiting them.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata

mod event;

pub use event::{Event, EventKind};
