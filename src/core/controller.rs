//! # Admission controller: the single decision point of a dispatcher.
//!
//! One controller task per dispatcher owns the [`DispatchState`] and is the
//! only place where a pending job is promoted to active.
//!
//! ## Architecture
//! ```text
//! Dispatcher handles ── Command ──┐
//!                                 ├──► Controller::run() ──► DispatchState
//! job executions ── completion ───┘          │
//!                                            ├──► spawn_job() per admitted job
//!                                            ├──► watch<Stats>  (Dispatcher::stats)
//!                                            ├──► join waiters  (Dispatcher::join)
//!                                            └──► Bus           (events)
//! ```
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► completion → state.complete()
//!   ├─► command    → submit / pause / resume / stop / join
//!   ├─► channel closed (every handle dropped) → stop
//!   ├─► admit while slots free, not suspended, not stopping
//!   ├─► publish stats, release join waiters if settled
//!   └─► exit when stopping and no job is active
//! }
//! ```
//!
//! ## Rules
//! - Completions are drained before commands (`biased`), so freed slots are
//!   visible before the next admission decision.
//! - Commands queued behind the exit are still answered: late submissions are
//!   reported as discarded and late joins are released.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    events::{Bus, Event, EventKind},
    handlers::Handler,
};

use super::{
    runner::spawn_job,
    state::{DispatchState, Stats},
};

/// Requests sent from [`Dispatcher`](crate::Dispatcher) handles.
pub(crate) enum Command<T> {
    Submit {
        item: T,
        /// Backlog permit; released when the job leaves the pending buffer.
        permit: Option<OwnedSemaphorePermit>,
    },
    Pause,
    Resume,
    Stop,
    Join(oneshot::Sender<()>),
}

/// A job waiting for admission.
struct Queued<T> {
    item: T,
    _permit: Option<OwnedSemaphorePermit>,
}

/// Channels and tokens shared with the handles.
pub(crate) struct ControllerParts<T> {
    pub commands: mpsc::UnboundedReceiver<Command<T>>,
    pub stats: watch::Sender<Stats>,
    pub stop: CancellationToken,
    pub terminated: CancellationToken,
}

pub(crate) struct Controller<T: Send + 'static> {
    state: DispatchState<Queued<T>>,
    handler: Arc<dyn Handler<T>>,
    bus: Bus,
    commands: mpsc::UnboundedReceiver<Command<T>>,
    attached: bool,
    done_tx: mpsc::UnboundedSender<u64>,
    done_rx: mpsc::UnboundedReceiver<u64>,
    waiters: Vec<oneshot::Sender<()>>,
    stats: watch::Sender<Stats>,
    stop: CancellationToken,
    terminated: CancellationToken,
}

impl<T: Send + 'static> Controller<T> {
    pub fn new(
        limit: Option<usize>,
        handler: Arc<dyn Handler<T>>,
        bus: Bus,
        parts: ControllerParts<T>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            state: DispatchState::new(limit),
            handler,
            bus,
            commands: parts.commands,
            attached: true,
            done_tx,
            done_rx,
            waiters: Vec::new(),
            stats: parts.stats,
            stop: parts.stop,
            terminated: parts.terminated,
        }
    }

    /// Starts the controller loop (spawns in background).
    pub fn spawn(self) {
        tokio::spawn(self.run());
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                Some(_id) = self.done_rx.recv() => self.state.complete(),
                cmd = self.commands.recv(), if self.attached => match cmd {
                    Some(cmd) => self.on_command(cmd),
                    None => self.on_detached(),
                },
            }

            self.admit();
            self.publish_stats(false);
            self.release_waiters();

            if self.state.is_finished() {
                break;
            }
        }

        self.finish();
    }

    fn on_command(&mut self, cmd: Command<T>) {
        match cmd {
            Command::Submit { item, permit } => self.on_submit(item, permit),
            Command::Pause => {
                if self.state.set_suspended(true) {
                    self.bus.publish(Event::new(EventKind::Paused));
                }
            }
            Command::Resume => {
                if self.state.set_suspended(false) {
                    self.bus.publish(Event::new(EventKind::Resumed));
                }
            }
            Command::Stop => self.on_stop("requested"),
            Command::Join(tx) => {
                if self.state.is_settled() {
                    let _ = tx.send(());
                } else {
                    self.waiters.push(tx);
                }
            }
        }
    }

    fn on_submit(&mut self, item: T, permit: Option<OwnedSemaphorePermit>) {
        let queued = Queued {
            item,
            _permit: permit,
        };
        match self.state.enqueue(queued) {
            Ok(id) => self.bus.publish(
                Event::new(EventKind::JobSubmitted)
                    .with_job(id)
                    .with_gauges(self.state.active(), self.state.pending()),
            ),
            Err(_rejected) => self.bus.publish(
                Event::new(EventKind::JobDiscarded).with_reason("submitted after stop"),
            ),
        }
    }

    /// Every handle was dropped without an explicit stop.
    fn on_detached(&mut self) {
        self.attached = false;
        self.on_stop("detached");
    }

    fn on_stop(&mut self, reason: &'static str) {
        self.stop.cancel();
        let Some(discarded) = self.state.request_stop() else {
            return;
        };

        self.bus.publish(
            Event::new(EventKind::StopRequested)
                .with_reason(reason)
                .with_gauges(self.state.active(), discarded.len()),
        );
        for (id, _queued) in discarded {
            self.bus.publish(
                Event::new(EventKind::JobDiscarded)
                    .with_job(id)
                    .with_reason("stopped before start"),
            );
        }
    }

    /// Promotes pending jobs while the state allows it.
    fn admit(&mut self) {
        while let Some((id, queued)) = self.state.admit() {
            let Queued {
                item,
                _permit: permit,
            } = queued;
            drop(permit);

            self.bus.publish(
                Event::new(EventKind::JobStarting)
                    .with_job(id)
                    .with_gauges(self.state.active(), self.state.pending()),
            );
            spawn_job(
                Arc::clone(&self.handler),
                id,
                item,
                self.bus.clone(),
                self.done_tx.clone(),
            );
        }
    }

    fn publish_stats(&self, stopped: bool) {
        let mut stats = self.state.stats();
        stats.stopped = stopped;
        self.stats.send_replace(stats);
    }

    fn release_waiters(&mut self) {
        if self.state.is_settled() {
            for tx in self.waiters.drain(..) {
                let _ = tx.send(());
            }
        }
    }

    /// Answers commands queued behind the exit, then marks the dispatcher terminated.
    fn finish(mut self) {
        self.commands.close();
        while let Ok(cmd) = self.commands.try_recv() {
            self.on_command(cmd);
        }

        self.publish_stats(true);
        for tx in self.waiters.drain(..) {
            let _ = tx.send(());
        }
        self.bus.publish(Event::new(EventKind::Stopped));
        self.terminated.cancel();
    }
}
