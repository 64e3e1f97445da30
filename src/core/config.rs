//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`] centralized settings for one dispatcher instance.
//!
//! ## Sentinel values
//! - `concurrency = 0` → unbounded (every pending job is admitted immediately)
//! - `backlog = 0` → unbounded pending buffer (submission never waits)

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
///
/// ## Field semantics
/// - `concurrency`: maximum simultaneously running handlers (`0` = unbounded)
/// - `backlog`: maximum jobs waiting for admission (`0` = unbounded)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Maximum number of handlers running at the same time.
    ///
    /// - `0` = unbounded
    /// - `n > 0` = at most `n` jobs are active simultaneously
    pub concurrency: usize,

    /// Maximum number of submitted jobs not yet admitted.
    ///
    /// - `0` = unbounded; the pending buffer grows with the producer
    /// - `n > 0` = `try_submit` returns `Full` and `submit` waits once `n` jobs are pending
    pub backlog: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl DispatcherConfig {
    /// Returns the concurrency ceiling as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` active jobs
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.concurrency == 0 {
            None
        } else {
            Some(self.concurrency)
        }
    }

    /// Returns the backlog bound as an `Option`.
    ///
    /// - `None` → unbounded pending buffer
    /// - `Some(n)` → at most `n` pending jobs
    #[inline]
    pub fn backlog_limit(&self) -> Option<usize> {
        if self.backlog == 0 {
            None
        } else {
            Some(self.backlog)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `concurrency = 0` (unbounded)
    /// - `backlog = 0` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            concurrency: 0,
            backlog: 0,
            bus_capacity: 1024,
        }
    }
}
