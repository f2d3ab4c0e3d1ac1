//! Timer Queue
//!
//! A cooperative `setTimeout`/`clearTimeout` pair over a virtual millisecond
//! clock. The host advances the clock; due tasks run in due order, ties in
//! scheduling order. Nothing runs on another thread.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

/// Handle returned by [`TimerQueue::set_timeout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct QueueState {
    now: u64,
    next_id: u64,
    /// Keyed by (due time, id) so iteration order is firing order
    timers: BTreeMap<(u64, TimerId), Task>,
}

/// Timer manager
#[derive(Default)]
pub struct TimerQueue {
    state: RefCell<QueueState>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.state.borrow().now
    }

    /// Schedule `task` to run `delay_ms` from now
    pub fn set_timeout(&self, delay_ms: u64, task: impl FnOnce() + 'static) -> TimerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let due = state.now.saturating_add(delay_ms);
        state.timers.insert((due, id), Box::new(task));
        id
    }

    /// Cancel a timer. Returns false when it already ran or was cleared.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut state = self.state.borrow_mut();
        let key = state.timers.keys().find(|(_, timer)| *timer == id).copied();
        match key {
            Some(key) => state.timers.remove(&key).is_some(),
            None => false,
        }
    }

    /// Number of scheduled timers
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Milliseconds until the next timer is due
    pub fn time_until_next(&self) -> Option<u64> {
        let state = self.state.borrow();
        state
            .timers
            .keys()
            .next()
            .map(|(due, _)| due.saturating_sub(state.now))
    }

    /// Move the clock forward by `ms`, running every task that falls due.
    /// Returns how many tasks ran.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now().saturating_add(ms);
        let mut ran = 0;

        while let Some(task) = self.pop_due(Some(target)) {
            task();
            ran += 1;
        }

        self.state.borrow_mut().now = target;
        ran
    }

    /// Run tasks until the queue is empty, jumping the clock to each due
    /// time. Returns how many tasks ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due(None) {
            task();
            ran += 1;
        }
        ran
    }

    /// Take the earliest task due by `limit` out of the queue so it runs
    /// without the queue borrowed.
    fn pop_due(&self, limit: Option<u64>) -> Option<Task> {
        let mut state = self.state.borrow_mut();
        let (due, _) = *state.timers.keys().next()?;
        if limit.is_some_and(|limit| due > limit) {
            return None;
        }
        let (_, task) = state.timers.pop_first()?;
        state.now = state.now.max(due);
        Some(task)
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}
