//! Runtime core: admission and lifecycle.
//!
//! The public API from this module is [`Dispatcher`] (the handle),
//! [`DispatcherBuilder`], [`DispatcherConfig`] and the [`Stats`] snapshot.
//!
//! Internal modules:
//! - [`state`]: the admission state machine (pending FIFO, counters, suspension);
//! - [`controller`]: the single task that owns the state and admits jobs;
//! - [`runner`]: executes one job with panic isolation and event publishing;
//! - [`shutdown`]: cross-platform shutdown signal handling;
//! - [`builder`]: wires bus, subscribers and controller together.

mod builder;
mod config;
mod controller;
mod dispatcher;
mod runner;
mod shutdown;
mod state;

pub use builder::DispatcherBuilder;
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use state::Stats;
