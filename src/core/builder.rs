use std::sync::Arc;

use tokio::sync::{Semaphore, broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    events::Bus,
    handlers::Handler,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{
    config::DispatcherConfig,
    controller::{Controller, ControllerParts},
    dispatcher::{Dispatcher, DispatcherParts},
    state::Stats,
};

/// Builder for constructing a [`Dispatcher`] with optional subscribers.
pub struct DispatcherBuilder {
    cfg: DispatcherConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (job lifecycle, failures, control changes)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the dispatcher and spawns its controller.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// - Event bus for broadcasting
    /// - Subscriber workers (if any)
    /// - Admission controller
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build<T, H>(self, handler: H) -> Dispatcher<T>
    where
        T: Send + 'static,
        H: Handler<T>,
    {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let stop = CancellationToken::new();
        let terminated = CancellationToken::new();
        let flushed = CancellationToken::new();

        if self.subscribers.is_empty() {
            flushed.cancel();
        } else {
            subscriber_listener(
                &bus,
                self.subscribers,
                terminated.clone(),
                flushed.clone(),
            );
        }

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (stats_tx, stats_rx) = watch::channel(Stats::default());
        let handler: Arc<dyn Handler<T>> = Arc::new(handler);

        Controller::new(
            self.cfg.concurrency_limit(),
            handler,
            bus.clone(),
            ControllerParts {
                commands: cmd_rx,
                stats: stats_tx,
                stop: stop.clone(),
                terminated: terminated.clone(),
            },
        )
        .spawn();

        Dispatcher::from_parts(DispatcherParts {
            commands: cmd_tx,
            backlog: self.cfg.backlog_limit().map(Semaphore::new).map(Arc::new),
            stats: stats_rx,
            bus,
            stop,
            terminated,
            flushed,
        })
    }
}

/// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
///
/// Runs until the controller terminates, then drains what is left on the bus
/// and waits for the subscriber workers.
fn subscriber_listener(
    bus: &Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    terminated: CancellationToken,
    flushed: CancellationToken,
) {
    let mut rx = bus.subscribe();
    let set = SubscriberSet::new(subscribers, bus.clone());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;

                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = terminated.cancelled() => break,
            }
        }

        loop {
            match rx.try_recv() {
                Ok(ev) => set.emit(&ev),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }

        set.shutdown().await;
        flushed.cancel();
    });
}
