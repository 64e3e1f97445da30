//! # Event bus.
//!
//! Every event in a dispatcher goes through one [`Bus`]: the controller, each
//! running job and the subscriber workers publish into it; the subscriber
//! listener and [`Dispatcher::subscribe`](crate::Dispatcher::subscribe)
//! receivers read from it.
//!
//! ```text
//! controller ─┐
//! job #n     ─┼──► Bus ──► subscriber listener ──► SubscriberSet
//! subscribers ┘       └──► Dispatcher::subscribe()
//! ```
//!
//! Publishing never waits. Receivers that fall more than `capacity` events
//! behind observe `RecvError::Lagged` and lose the oldest events; events sent
//! while nobody listens are gone.

use tokio::sync::broadcast;

use super::event::Event;

/// Shared publishing side of the dispatcher event stream.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus retaining at most `capacity` undelivered events (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to every current receiver; a no-op without receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
