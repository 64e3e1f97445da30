//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(T) -> Fut`, producing a fresh future per job.
//! The closure is shared between concurrent jobs; if jobs need common mutable state,
//! capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use jobvisor::{HandlerError, HandlerFn};
//!
//! let h = HandlerFn::new(|n: u32| async move {
//!     if n == 0 {
//!         return Err(HandlerError::failed("zero"));
//!     }
//!     Ok(())
//! });
//! # let _ = h;
//! ```

use std::future::Future;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handlers::Handler;

/// Function-backed handler implementation.
#[derive(Debug, Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Wraps a closure that creates a new future per job.
    pub fn new<T, Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<(), HandlerError>>,
    {
        Self { f }
    }
}

#[async_trait]
impl<T, F, Fut> Handler<T> for HandlerFn<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, item: T) -> Result<(), HandlerError> {
        (self.f)(item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_item_and_result() {
        let h = HandlerFn::new(|n: u32| async move {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err(HandlerError::failed(format!("odd {n}")))
            }
        });

        assert!(h.handle(2).await.is_ok());
        let err = h.handle(3).await.unwrap_err();
        assert_eq!(err.to_string(), "job failed: odd 3");
    }
}
