//! # LogWriter: stdout event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [submitted] job=1 active=0 pending=1
//! [starting] job=1 active=1 pending=0
//! [completed] job=1
//! [failed] job=2 err="connection refused"
//! [panicked] job=3 info="index out of bounds"
//! [paused]
//! [resumed]
//! [stop-requested] reason="requested" active=1 pending=0
//! [discarded] job=4 reason="stopped before start"
//! [stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let job = e.job.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("unknown");

        match e.kind {
            EventKind::JobSubmitted => {
                println!(
                    "[submitted] job={job} active={:?} pending={:?}",
                    e.active, e.pending
                );
            }
            EventKind::JobStarting => {
                println!(
                    "[starting] job={job} active={:?} pending={:?}",
                    e.active, e.pending
                );
            }
            EventKind::JobCompleted => println!("[completed] job={job}"),
            EventKind::JobFailed => println!("[failed] job={job} err={reason:?}"),
            EventKind::JobPanicked => println!("[panicked] job={job} info={reason:?}"),
            EventKind::JobDiscarded => println!("[discarded] job={job} reason={reason:?}"),
            EventKind::Paused => println!("[paused]"),
            EventKind::Resumed => println!("[resumed]"),
            EventKind::StopRequested => {
                println!(
                    "[stop-requested] reason={reason:?} active={:?} pending={:?}",
                    e.active, e.pending
                );
            }
            EventKind::Stopped => println!("[stopped]"),
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={} reason={reason:?}",
                    e.subscriber.unwrap_or("unknown")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={reason}",
                    e.subscriber.unwrap_or("unknown")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
