//! # Runtime events emitted by the dispatcher and job executions.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Job events**: per-job flow (submitted, starting, completed, failed, panicked, discarded)
//! - **Control events**: dispatcher state changes (paused, resumed, stop requested, stopped)
//! - **Subscriber events**: delivery problems of the fan-out layer (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, job id,
//! reasons, and the active/pending gauges observed by the admission controller.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use jobvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::JobFailed)
//!     .with_job(7)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::JobFailed);
//! assert_eq!(ev.job, Some(7));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Job events ===
    /// Job accepted into the pending buffer.
    ///
    /// Sets:
    /// - `job`: job id
    /// - `active`, `pending`: gauges after enqueue
    JobSubmitted,

    /// Job admitted; its handler is about to run.
    ///
    /// Sets:
    /// - `job`: job id
    /// - `active`, `pending`: gauges after admission
    JobStarting,

    /// Handler returned `Ok(())`.
    ///
    /// Sets:
    /// - `job`: job id
    JobCompleted,

    /// Handler returned an error.
    ///
    /// Sets:
    /// - `job`: job id
    /// - `reason`: failure message
    JobFailed,

    /// Handler panicked; the panic was caught at the execution boundary.
    ///
    /// Sets:
    /// - `job`: job id
    /// - `reason`: panic message
    JobPanicked,

    /// Job was dropped without running (stop requested before admission).
    ///
    /// Sets:
    /// - `job`: job id (absent if the job never reached the pending buffer)
    /// - `reason`: why it was dropped
    JobDiscarded,

    // === Control events ===
    /// Admission suspended.
    Paused,

    /// Admission resumed.
    Resumed,

    /// Graceful stop requested; pending jobs are discarded.
    ///
    /// Sets:
    /// - `active`, `pending`: gauges right after the request
    /// - `reason`: `"requested"` or `"detached"` (all handles dropped)
    StopRequested,

    /// All active jobs finished; the admission controller exited.
    Stopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Job id assigned at submission (starting from 1).
    pub job: Option<u64>,
    /// Human-readable reason (errors, panic payloads, overflow details).
    pub reason: Option<Arc<str>>,
    /// Subscriber name for subscriber events.
    pub subscriber: Option<&'static str>,
    /// Active jobs observed by the admission controller.
    pub active: Option<usize>,
    /// Pending jobs observed by the admission controller.
    pub pending: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: None,
            reason: None,
            subscriber: None,
            active: None,
            pending: None,
        }
    }

    /// Attaches a job id.
    #[inline]
    pub fn with_job(mut self, id: u64) -> Self {
        self.job = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the active/pending gauges.
    #[inline]
    pub fn with_gauges(mut self, active: usize, pending: usize) -> Self {
        self.active = Some(active);
        self.pending = Some(pending);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"));
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }

    /// True for the terminal event of an admitted job.
    #[inline]
    pub fn is_job_finished(&self) -> bool {
        matches!(
            self.kind,
            EventKind::JobCompleted | EventKind::JobFailed | EventKind::JobPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::Paused);
        let b = Event::new(EventKind::Resumed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn subscriber_events_carry_name() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));

        let ev = Event::subscriber_panicked("audit", "boom".into());
        assert!(ev.is_subscriber_panic());
        assert!(!ev.is_job_finished());
    }
}
