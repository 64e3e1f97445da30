//! # Dispatcher: handle to a running admission controller.
//!
//! [`Dispatcher`] is a cheap, cloneable handle. Every operation except
//! [`join`](Dispatcher::join) and [`shutdown`](Dispatcher::shutdown) is a
//! non-blocking request to the controller task.
//!
//! ## Lifecycle
//! ```text
//! new()/build() ──► controller spawned (accepting, not suspended)
//!      │
//!      ├─► try_submit()/submit() ──► pending FIFO ──► admitted when a slot is free
//!      ├─► pause()/resume()        (idempotent; running jobs unaffected)
//!      ├─► join()                  (waits until nothing is outstanding)
//!      │
//!      └─► stop() / shutdown() / last handle dropped
//!               ├─► pending jobs discarded (JobDiscarded each)
//!               ├─► active jobs run to completion
//!               └─► controller exits (Stopped)
//! ```
//!
//! ## Teardown
//! Pair construction with [`shutdown`](Dispatcher::shutdown). Dropping every
//! handle also stops the dispatcher gracefully, but nothing waits for it.

use std::sync::Arc;

use tokio::sync::{Semaphore, TryAcquireError, broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        DispatcherBuilder, DispatcherConfig, controller::Command, shutdown,
        state::Stats,
    },
    error::SubmitError,
    events::{Bus, Event},
    handlers::Handler,
};

/// Handle for submitting jobs and controlling a dispatcher.
///
/// Must be created inside a Tokio runtime.
///
/// ## Example
/// ```rust
/// use jobvisor::{Dispatcher, HandlerError, HandlerFn};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let dispatcher = Dispatcher::new(
///         HandlerFn::new(|key: String| async move {
///             println!("copying {key}");
///             Ok::<_, HandlerError>(())
///         }),
///         4,
///     );
///
///     for key in ["a.txt", "b.txt", "c.txt"] {
///         dispatcher.try_submit(key.to_string())?;
///     }
///     dispatcher.join().await;
///     dispatcher.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct Dispatcher<T: Send + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
    backlog: Option<Arc<Semaphore>>,
    stats: watch::Receiver<Stats>,
    bus: Bus,
    /// Cancelled as soon as stop is requested.
    stop: CancellationToken,
    /// Cancelled when the controller exits.
    terminated: CancellationToken,
    /// Cancelled when subscribers have seen the last event.
    flushed: CancellationToken,
}

/// Everything the builder wires into a handle.
pub(crate) struct DispatcherParts<T> {
    pub commands: mpsc::UnboundedSender<Command<T>>,
    pub backlog: Option<Arc<Semaphore>>,
    pub stats: watch::Receiver<Stats>,
    pub bus: Bus,
    pub stop: CancellationToken,
    pub terminated: CancellationToken,
    pub flushed: CancellationToken,
}

impl<T: Send + 'static> Dispatcher<T> {
    /// Creates a dispatcher with the given concurrency limit (`0` = unbounded)
    /// and default settings otherwise.
    pub fn new<H: Handler<T>>(handler: H, concurrency: usize) -> Self {
        let cfg = DispatcherConfig {
            concurrency,
            ..DispatcherConfig::default()
        };
        DispatcherBuilder::new(cfg).build(handler)
    }

    pub(crate) fn from_parts(parts: DispatcherParts<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                commands: parts.commands,
                backlog: parts.backlog,
                stats: parts.stats,
                bus: parts.bus,
                stop: parts.stop,
                terminated: parts.terminated,
                flushed: parts.flushed,
            }),
        }
    }

    /// Submits a job without waiting.
    ///
    /// ### Errors
    /// - [`SubmitError::Stopped`] once [`stop`](Self::stop) was called
    /// - [`SubmitError::Full`] when a bounded backlog is at capacity
    /// - [`SubmitError::Closed`] when the controller already exited
    pub fn try_submit(&self, item: T) -> Result<(), SubmitError> {
        if self.inner.stop.is_cancelled() {
            return Err(SubmitError::Stopped);
        }
        let permit = match &self.inner.backlog {
            Some(sem) => Some(Arc::clone(sem).try_acquire_owned().map_err(|e| match e {
                TryAcquireError::NoPermits => SubmitError::Full,
                TryAcquireError::Closed => SubmitError::Closed,
            })?),
            None => None,
        };
        self.send(Command::Submit { item, permit })
    }

    /// Submits a job, waiting for backlog room if the backlog is bounded.
    ///
    /// With an unbounded backlog this never waits. A stop requested while
    /// waiting aborts the submission with [`SubmitError::Stopped`].
    pub async fn submit(&self, item: T) -> Result<(), SubmitError> {
        if self.inner.stop.is_cancelled() {
            return Err(SubmitError::Stopped);
        }
        let permit = match &self.inner.backlog {
            Some(sem) => tokio::select! {
                biased;

                _ = self.inner.stop.cancelled() => return Err(SubmitError::Stopped),
                res = Arc::clone(sem).acquire_owned() => {
                    Some(res.map_err(|_| SubmitError::Closed)?)
                }
            },
            None => None,
        };
        self.send(Command::Submit { item, permit })
    }

    /// Suspends admission. Running jobs are unaffected; `join` keeps waiting
    /// until [`resume`](Self::resume). Idempotent.
    pub fn pause(&self) {
        let _ = self.inner.commands.send(Command::Pause);
    }

    /// Lifts a suspension. Idempotent.
    pub fn resume(&self) {
        let _ = self.inner.commands.send(Command::Resume);
    }

    /// Requests graceful stop. Idempotent.
    ///
    /// Pending jobs are discarded without running, active jobs finish, then the
    /// controller exits. Further submissions fail with [`SubmitError::Stopped`].
    pub fn stop(&self) {
        self.inner.stop.cancel();
        let _ = self.inner.commands.send(Command::Stop);
    }

    /// Waits until every submitted job has completed (or was discarded) and the
    /// dispatcher is not paused.
    ///
    /// Safe to call from many tasks at once. Returns immediately once the
    /// dispatcher has terminated. A dispatcher that stays paused keeps `join`
    /// waiting forever.
    pub async fn join(&self) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        if self.inner.commands.send(Command::Join(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }

    /// Stops the dispatcher and waits until the controller exited and the
    /// subscribers received the final events.
    pub async fn shutdown(&self) {
        self.stop();
        self.inner.terminated.cancelled().await;
        self.inner.flushed.cancelled().await;
    }

    /// Stops the dispatcher when the process receives a termination signal.
    ///
    /// The watcher does not keep the dispatcher alive and ends with it.
    pub fn stop_on_signal(&self) {
        let weak = Arc::downgrade(&self.inner);
        let terminated = self.inner.terminated.clone();

        tokio::spawn(async move {
            tokio::select! {
                res = shutdown::wait_for_shutdown_signal() => {
                    if res.is_ok() {
                        if let Some(inner) = weak.upgrade() {
                            Dispatcher { inner }.stop();
                        }
                    }
                }
                _ = terminated.cancelled() => {}
            }
        });
    }

    /// Returns a best-effort snapshot of the dispatcher counters.
    pub fn stats(&self) -> Stats {
        *self.inner.stats.borrow()
    }

    /// True once the controller exited.
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.is_cancelled()
    }

    /// Creates a receiver for the raw event stream (events sent after this call).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    fn send(&self, cmd: Command<T>) -> Result<(), SubmitError> {
        self.inner
            .commands
            .send(cmd)
            .map_err(|_| SubmitError::Closed)
    }
}
