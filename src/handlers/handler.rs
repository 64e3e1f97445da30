//! # Job handler abstraction.
//!
//! A [`Handler`] is invoked once per admitted job and receives the job item by value.
//! It never sees dispatcher state; everything it needs must travel in the item or be
//! captured by the handler itself.

use async_trait::async_trait;

use crate::error::HandlerError;

/// # Asynchronous job handler.
///
/// The dispatcher treats every outcome as completion: `Ok`, `Err` and even a panic
/// free the concurrency slot. Errors and panics are only reported on the event bus.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use jobvisor::{Handler, HandlerError};
///
/// struct Upload;
///
/// #[async_trait]
/// impl Handler<String> for Upload {
///     async fn handle(&self, key: String) -> Result<(), HandlerError> {
///         if key.is_empty() {
///             return Err(HandlerError::failed("empty key"));
///         }
///         // transfer the object...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<T: Send + 'static>: Send + Sync + 'static {
    /// Processes one job item.
    async fn handle(&self, item: T) -> Result<(), HandlerError>;
}
