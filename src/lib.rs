//! # jobvisor
//!
//! **Jobvisor** is a bounded-concurrency job dispatcher for Tokio.
//!
//! It accepts an unbounded stream of jobs, runs each through a caller-supplied
//! [`Handler`], and never lets more than `concurrency` handlers run at once.
//! Admission can be paused and resumed at runtime, stop drains gracefully, and
//! [`Dispatcher::join`] tells the caller when all submitted work is done.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer A        producer B        producer C
//!       │                 │                 │
//!       └──── try_submit / submit / pause / resume / stop / join ────┐
//!                                                                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller (single admission decision point)                     │
//! │  - pending FIFO                                                   │
//! │  - active / outstanding counters, suspended, stopping             │
//! │  - join waiters                                                   │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │    job #1    │   │    job #2    │   │    job #k    │   │ (k ≤ concurrency)
//!     │   handle()   │   │   handle()   │   │   handle()   │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ completion       │ completion       │ completion      │
//!      └──────────────────┴──────────────────┴──► controller   │
//!                                                              │
//!      Publishes events: JobSubmitted, JobStarting, JobCompleted,
//!      JobFailed, JobPanicked, JobDiscarded, Paused, Resumed, ...
//!                                                              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │            (capacity: DispatcherConfig::bus_capacity)             │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                       ┌───────────┼───────────┐
//!                       ▼           ▼           ▼
//!                    sub1.on     sub2.on     subN.on
//!                    _event()    _event()    _event()
//! ```
//!
//! ### Semantics
//! - Jobs **start** in submission order; completion order is unspecified.
//! - `pause` stops admissions only; running jobs finish. While paused, `join` waits.
//! - `stop` discards pending jobs (each reported as `JobDiscarded`), lets active
//!   jobs finish, then the controller exits. Later submissions fail with
//!   [`SubmitError::Stopped`].
//! - Handler errors and panics are reported as events and otherwise count as
//!   completion; they never leak a concurrency slot.
//! - There is no finalizer: call [`Dispatcher::shutdown`] to tear down. Dropping
//!   every handle stops the dispatcher gracefully in the background.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                        |
//! |-------------------|----------------------------------------------------------|-------------------------------------------|
//! | **Dispatch**      | Bounded admission, pause/resume, drain, join.            | [`Dispatcher`], [`DispatcherBuilder`]     |
//! | **Handlers**      | Per-job async processing.                                | [`Handler`], [`HandlerFn`]                |
//! | **Subscriber API**| Hook into job lifecycle events (logging, metrics).       | [`Subscribe`], [`Event`], [`EventKind`]   |
//! | **Errors**        | Typed misuse and handler errors.                         | [`SubmitError`], [`HandlerError`]         |
//! | **Sources**       | Feed line-oriented input into a dispatcher.              | [`sources::feed_lines`]                   |
//! | **Configuration** | Concurrency, backlog bound, bus capacity.                | [`DispatcherConfig`]                      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use jobvisor::{DispatcherBuilder, DispatcherConfig, HandlerError, HandlerFn, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = DispatcherConfig { concurrency: 2, ..DispatcherConfig::default() };
//!
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(jobvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
//!
//!     let dispatcher = DispatcherBuilder::new(cfg)
//!         .with_subscribers(subs)
//!         .build(HandlerFn::new(|n: u64| async move {
//!             if n == 3 {
//!                 return Err(HandlerError::failed("unlucky"));
//!             }
//!             Ok(())
//!         }));
//!
//!     for n in 0..5 {
//!         dispatcher.try_submit(n)?;
//!     }
//!     dispatcher.join().await;
//!     dispatcher.shutdown().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod handlers;
mod subscribers;

pub mod sources;

// ---- Public re-exports ----

pub use core::{Dispatcher, DispatcherBuilder, DispatcherConfig, Stats};
pub use error::{FeedError, HandlerError, SubmitError};
pub use events::{Event, EventKind};
pub use handlers::{Handler, HandlerFn};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
