//! Debounce
//!
//! Trailing-edge debounce on top of [`TimerQueue`]: every call cancels the
//! pending one and schedules a new timer, so a burst collapses into a single
//! invocation with the last arguments.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::timers::{TimerId, TimerQueue};

struct DebounceState<A> {
    func: Box<dyn Fn(A)>,
    delay_ms: u64,
    timers: Rc<TimerQueue>,
    pending: Cell<Option<TimerId>>,
}

/// Debounced wrapper around a function of `A`.
///
/// Clones share the same pending slot, so a clone handed to an event bus and
/// the original kept for cancellation are the same wrapper.
pub struct Debounced<A: 'static> {
    state: Rc<DebounceState<A>>,
}

impl<A: 'static> Debounced<A> {
    pub fn new(func: impl Fn(A) + 'static, delay_ms: u64, timers: Rc<TimerQueue>) -> Self {
        Self {
            state: Rc::new(DebounceState {
                func: Box::new(func),
                delay_ms,
                timers,
                pending: Cell::new(None),
            }),
        }
    }

    /// Schedule `func(args)` after the delay, replacing any pending call
    pub fn call(&self, args: A) {
        self.cancel();

        let state = Rc::downgrade(&self.state);
        let id = self.state.timers.set_timeout(self.state.delay_ms, move || {
            // Dropped wrappers leave their timers inert
            if let Some(state) = state.upgrade() {
                state.pending.set(None);
                (state.func)(args);
            }
        });
        self.state.pending.set(Some(id));
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        if let Some(id) = self.state.pending.take() {
            self.state.timers.clear_timeout(id);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    pub fn delay_ms(&self) -> u64 {
        self.state.delay_ms
    }

    /// Whether both handles are the same wrapper
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<A: 'static> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self { state: Rc::clone(&self.state) }
    }
}

impl<A: 'static> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay_ms", &self.state.delay_ms)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Wrap `func` so it runs `delay_ms` after the last call of a burst
pub fn debounce<A: 'static>(
    func: impl Fn(A) + 'static,
    delay_ms: u64,
    timers: Rc<TimerQueue>,
) -> Debounced<A> {
    Debounced::new(func, delay_ms, timers)
}
