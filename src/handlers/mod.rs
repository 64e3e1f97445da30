//! # Job handler abstractions.
//!
//! - [`Handler`] - trait for async per-job processing
//! - [`HandlerFn`] - closure-backed handler implementation

mod handler;
mod handler_fn;

pub use handler::Handler;
pub use handler_fn::HandlerFn;
