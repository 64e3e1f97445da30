//! # Subscriber trait.
//!
//! [`Subscribe`] is how callers observe a dispatcher without touching its hot
//! path: logging, metrics, progress bars, audit trails.
//!
//! Each subscriber is driven by its own worker task fed from a bounded queue,
//! so a slow or broken subscriber only hurts itself:
//! - a full queue drops the event for that subscriber and reports
//!   `EventKind::SubscriberOverflow`
//! - a panic in [`Subscribe::on_event`] is caught and reported as
//!   `EventKind::SubscriberPanicked`; the worker keeps going
//!
//! Delivery is FIFO per subscriber; there is no ordering across subscribers
//! (use [`Event::seq`] for that).
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use async_trait::async_trait;
//! use jobvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::JobFailed | EventKind::JobPanicked) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure-counter"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Receives dispatcher events on a dedicated worker task.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Must not block the executor.
    async fn on_event(&self, event: &Event);

    /// Name reported in overflow and panic events.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue length before events are dropped for this subscriber (min 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
