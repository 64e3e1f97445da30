//! Error types used by the jobvisor dispatcher and job handlers.
//!
//! This module defines three error enums:
//!
//! - [`SubmitError`]: misuse of the dispatcher (submitting after stop, full backlog).
//! - [`HandlerError`]: failures reported by a job handler.
//! - [`FeedError`]: failures while feeding a work source into the dispatcher.
//!
//! All of them provide `as_label` helpers for logging/metrics.

use thiserror::Error;

/// # Errors returned when submitting a job.
///
/// Submission is the only place where the dispatcher can be misused;
/// every other control operation is fire-and-forget.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Stop was requested; the dispatcher no longer accepts jobs.
    #[error("dispatcher is stopping; submission rejected")]
    Stopped,

    /// Bounded backlog is at capacity (try again later or use async `submit`).
    #[error("backlog full")]
    Full,

    /// Admission controller is gone (dispatcher already terminated).
    #[error("dispatcher channel closed")]
    Closed,
}

impl SubmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobvisor::SubmitError;
    ///
    /// assert_eq!(SubmitError::Full.as_label(), "submit_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::Stopped => "submit_stopped",
            SubmitError::Full => "submit_full",
            SubmitError::Closed => "submit_closed",
        }
    }
}

/// # Errors produced by job handlers.
///
/// The dispatcher never interprets these: a failed job frees its slot exactly
/// like a successful one. The error is only reported as
/// [`EventKind::JobFailed`](crate::EventKind::JobFailed).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Job execution failed.
    #[error("job failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(error: impl Into<String>) -> Self {
        HandlerError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "job_failed",
        }
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        HandlerError::Failed {
            error: format!("{err:#}"),
        }
    }
}

/// # Errors produced while feeding a work source.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FeedError {
    /// Reading the source failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The dispatcher refused a job.
    #[error("submit failed: {0}")]
    Submit(#[from] SubmitError),
}

impl FeedError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FeedError::Io(_) => "feed_io",
            FeedError::Submit(e) => e.as_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("fetch object");
        let handler_err = HandlerError::from(err);

        assert_eq!(handler_err.as_label(), "job_failed");
        assert_eq!(
            handler_err.to_string(),
            "job failed: fetch object: connection refused"
        );
    }

    #[test]
    fn feed_error_reuses_submit_labels() {
        let err = FeedError::from(SubmitError::Stopped);
        assert_eq!(err.as_label(), "submit_stopped");

        let err = FeedError::from(std::io::Error::other("eof"));
        assert_eq!(err.as_label(), "feed_io");
    }
}
