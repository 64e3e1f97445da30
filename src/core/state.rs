//! # Dispatch state machine.
//!
//! [`DispatchState`] holds everything the admission controller decides on:
//! the pending FIFO, the active count, suspension, stop, and the outstanding
//! counter that [`Dispatcher::join`](crate::Dispatcher::join) waits on.
//!
//! It is a plain struct with no synchronization; exactly one owner (the
//! controller task) mutates it, which is what keeps admission race-free.
//!
//! ## Outstanding accounting
//! ```text
//! outstanding = pending + active + (suspended ? 1 : 0)
//! ```
//! The synthetic unit is added on the `false → true` suspension transition and
//! removed on `true → false`, so repeated `pause`/`resume` calls are no-ops.
//! Stop discards pending jobs and lifts suspension, so once the last active
//! job finishes outstanding is back to zero.

use std::collections::VecDeque;

/// Best-effort snapshot of dispatcher counters.
///
/// Not transactionally consistent with concurrent submissions: by the time the
/// caller reads it the controller may have moved on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Jobs whose handler is running.
    pub active: usize,
    /// Jobs waiting for admission.
    pub pending: usize,
    /// Units `join` is waiting for (pending + active + 1 while paused).
    pub outstanding: usize,
    /// Admission is suspended.
    pub suspended: bool,
    /// Stop was requested.
    pub stopping: bool,
    /// The controller exited; no job will ever start again.
    pub stopped: bool,
}

pub(crate) struct DispatchState<T> {
    limit: Option<usize>,
    pending: VecDeque<(u64, T)>,
    active: usize,
    suspended: bool,
    stopping: bool,
    outstanding: usize,
    next_id: u64,
}

impl<T> DispatchState<T> {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            pending: VecDeque::new(),
            active: 0,
            suspended: false,
            stopping: false,
            outstanding: 0,
            next_id: 1,
        }
    }

    /// Appends a job to the pending tail and returns its id.
    ///
    /// Rejected (item handed back) once stop was requested.
    pub fn enqueue(&mut self, item: T) -> Result<u64, T> {
        if self.stopping {
            return Err(item);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back((id, item));
        self.outstanding += 1;
        Ok(id)
    }

    /// Promotes the head of the pending buffer to active, if admission allows it.
    pub fn admit(&mut self) -> Option<(u64, T)> {
        if self.suspended || self.stopping || !self.has_free_slot() {
            return None;
        }
        let job = self.pending.pop_front()?;
        self.active += 1;
        Some(job)
    }

    /// Records the end of an active job (success, failure or panic alike).
    pub fn complete(&mut self) {
        debug_assert!(self.active > 0, "completion without an active job");
        self.active = self.active.saturating_sub(1);
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    /// Sets suspension; returns `true` only on an actual transition.
    ///
    /// Ignored once stop was requested.
    pub fn set_suspended(&mut self, suspended: bool) -> bool {
        if self.stopping || self.suspended == suspended {
            return false;
        }
        self.suspended = suspended;
        if suspended {
            self.outstanding += 1;
        } else {
            self.outstanding -= 1;
        }
        true
    }

    /// Requests stop. Returns the discarded pending jobs on the first call, `None` afterwards.
    pub fn request_stop(&mut self) -> Option<Vec<(u64, T)>> {
        if self.stopping {
            return None;
        }
        self.set_suspended(false);
        self.stopping = true;

        let discarded: Vec<_> = self.pending.drain(..).collect();
        self.outstanding -= discarded.len();
        Some(discarded)
    }

    /// Nothing left to wait for.
    pub fn is_settled(&self) -> bool {
        self.outstanding == 0
    }

    /// Stop was requested and the last active job finished.
    pub fn is_finished(&self) -> bool {
        self.stopping && self.active == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            active: self.active,
            pending: self.pending.len(),
            outstanding: self.outstanding,
            suspended: self.suspended,
            stopping: self.stopping,
            stopped: false,
        }
    }

    fn has_free_slot(&self) -> bool {
        self.limit.is_none_or(|limit| self.active < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_admissions<T>(state: &mut DispatchState<T>) -> Vec<u64> {
        let mut ids = Vec::new();
        while let Some((id, _)) = state.admit() {
            ids.push(id);
        }
        ids
    }

    #[test]
    fn admission_respects_ceiling() {
        let mut state = DispatchState::new(Some(2));
        for n in 0..5 {
            state.enqueue(n).unwrap();
        }

        assert_eq!(drain_admissions(&mut state), vec![1, 2]);
        assert_eq!(state.active(), 2);
        assert_eq!(state.pending(), 3);

        state.complete();
        assert_eq!(drain_admissions(&mut state), vec![3]);
        assert_eq!(state.active(), 2);
    }

    #[test]
    fn unbounded_admits_everything() {
        let mut state = DispatchState::new(None);
        for n in 0..100 {
            state.enqueue(n).unwrap();
        }
        assert_eq!(drain_admissions(&mut state).len(), 100);
        assert_eq!(state.pending(), 0);
    }

    #[test]
    fn admission_is_fifo() {
        let mut state = DispatchState::new(Some(1));
        for item in ["a", "b", "c"] {
            state.enqueue(item).unwrap();
        }

        let mut order = Vec::new();
        while let Some((_, item)) = state.admit() {
            order.push(item);
            state.complete();
        }
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(state.is_settled());
    }

    #[test]
    fn suspension_blocks_admission_and_holds_outstanding() {
        let mut state: DispatchState<u8> = DispatchState::new(Some(4));
        assert!(state.is_settled());

        assert!(state.set_suspended(true));
        assert!(!state.set_suspended(true));
        assert!(!state.is_settled());
        assert_eq!(state.stats().outstanding, 1);

        state.enqueue(1).unwrap();
        assert!(state.admit().is_none());

        assert!(state.set_suspended(false));
        assert!(!state.set_suspended(false));
        assert_eq!(state.admit().map(|(id, _)| id), Some(1));
        state.complete();
        assert!(state.is_settled());
    }

    #[test]
    fn stop_discards_pending_and_lifts_suspension() {
        let mut state = DispatchState::new(Some(1));
        for n in 0..4 {
            state.enqueue(n).unwrap();
        }
        assert!(state.admit().is_some());
        state.set_suspended(true);

        let discarded = state.request_stop().expect("first stop");
        assert_eq!(discarded.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(state.request_stop().is_none());

        assert!(!state.is_finished());
        assert_eq!(state.stats().outstanding, 1);
        assert!(!state.stats().suspended);

        state.complete();
        assert!(state.is_finished());
        assert!(state.is_settled());
    }

    #[test]
    fn stopping_rejects_new_work_and_pause() {
        let mut state = DispatchState::new(None);
        state.request_stop();

        assert_eq!(state.enqueue(9), Err(9));
        assert!(!state.set_suspended(true));
        assert!(state.admit().is_none());
        assert!(state.is_finished());
    }
}
