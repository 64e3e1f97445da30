//! # Run a single admitted job.
//!
//! Executes the handler for one job on its own Tokio task and reports the outcome.
//!
//! ## Event flow
//! ```text
//! Success:  handler.handle() → Ok(())    → publish JobCompleted
//! Failure:  handler.handle() → Err(e)    → publish JobFailed
//! Panic:    handler.handle() → unwinding → publish JobPanicked
//!
//! Always (drop guard): completion id → controller
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal event per job (unless the task is aborted)
//! - Panics are caught at the execution boundary and never reach the controller
//! - The completion signal is sent from a drop guard, so the slot is released even
//!   if the job task is aborted by runtime shutdown

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::{
    events::{Bus, Event, EventKind},
    handlers::Handler,
    subscribers::panic_message,
};

/// Reports job completion to the controller when dropped.
struct Completion {
    id: u64,
    done: mpsc::UnboundedSender<u64>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        let _ = self.done.send(self.id);
    }
}

/// Spawns the execution of job `id`.
pub(crate) fn spawn_job<T: Send + 'static>(
    handler: Arc<dyn Handler<T>>,
    id: u64,
    item: T,
    bus: Bus,
    done: mpsc::UnboundedSender<u64>,
) {
    let guard = Completion { id, done };
    tokio::spawn(async move {
        let _guard = guard;
        run_job(handler, id, item, &bus).await;
    });
}

/// Runs the handler once and publishes the terminal event.
async fn run_job<T: Send + 'static>(handler: Arc<dyn Handler<T>>, id: u64, item: T, bus: &Bus) {
    // `handle` is called inside the guarded future: an impl may panic before
    // returning its future.
    let res = AssertUnwindSafe(async move { handler.handle(item).await })
        .catch_unwind()
        .await;

    let ev = match res {
        Ok(Ok(())) => Event::new(EventKind::JobCompleted),
        Ok(Err(e)) => Event::new(EventKind::JobFailed).with_reason(e.to_string()),
        Err(payload) => {
            Event::new(EventKind::JobPanicked).with_reason(panic_message(payload.as_ref()))
        }
    };
    bus.publish(ev.with_job(id));
}
