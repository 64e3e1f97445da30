//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the admission controller, job executions (`runner`),
//!   `SubscriberSet` (overflow/panic).
//! - **Consumers**: the subscriber listener spawned by the builder, and any
//!   receiver returned by [`Dispatcher::subscribe`](crate::Dispatcher::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
