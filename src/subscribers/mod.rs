//! # Event subscribers for the jobvisor dispatcher.
//!
//! This module provides the [`Subscribe`] trait, the `SubscriberSet` fan-out
//! and built-in implementations for handling events broadcast through the bus.
//!
//! ## Architecture
//! ```text
//! Controller / jobs ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet::emit
//!                                                                           │
//!                                                                ┌──────────┼──────────┐
//!                                                                ▼          ▼          ▼
//!                                                            LogWriter   Metrics    Custom
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub(crate) use set::panic_message;
pub(crate) use set::SubscriberSet;
pub use subscriber::Subscribe;
