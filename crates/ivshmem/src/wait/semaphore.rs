// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Counting semaphore.

use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use super::{Cancel, WaitError};

#[derive(Debug, Default)]
struct State {
    count: u32,
    cancel: Cancel,
    closed: bool,
}

/// Counting semaphore with interruptible, optionally bounded waits.
///
/// `down` only succeeds by consuming a unit; the count never underflows.
#[derive(Debug, Default)]
pub struct Semaphore {
    state: Mutex<State>,
    cond: Condvar,
}

impl Semaphore {
    /// Create a semaphore with a count of zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the count.
    ///
    /// Waiters blocked in `down` re-evaluate immediately.
    pub fn arm(&self, count: u32) {
        let mut state = self.state.lock();
        state.count = count;
        drop(state);
        self.cond.notify_all();
    }

    /// Release one unit and wake one waiter.
    pub fn up(&self) {
        let mut state = self.state.lock();
        state.count = state.count.saturating_add(1);
        drop(state);
        self.cond.notify_one();
    }

    /// Consume one unit, blocking until one is available.
    ///
    /// With a deadline, gives up with [`WaitError::TimedOut`] once it has
    /// passed. A unit that arrives together with the deadline still wins.
    pub fn down(&self, deadline: Option<Instant>) -> Result<(), WaitError> {
        let mut state = self.state.lock();
        let epoch = state.cancel.epoch;
        loop {
            if state.closed {
                return Err(WaitError::Closed);
            }
            if state.count > 0 {
                state.count -= 1;
                return Ok(());
            }
            if state.cancel.take(epoch) {
                return Err(WaitError::Interrupted);
            }
            state.cancel.blocked += 1;
            let timed_out = match deadline {
                Some(deadline) => self.cond.wait_until(&mut state, deadline).timed_out(),
                None => {
                    self.cond.wait(&mut state);
                    false
                }
            };
            state.cancel.blocked -= 1;
            if timed_out {
                if state.count > 0 && !state.closed {
                    state.count -= 1;
                    return Ok(());
                }
                return Err(WaitError::TimedOut);
            }
        }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.state.lock().count
    }

    /// Cancel every wait currently blocked, or the next one if none is.
    pub fn interrupt(&self) {
        let mut state = self.state.lock();
        state.cancel.request();
        drop(state);
        self.cond.notify_all();
    }

    /// Fail all current and future waits.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.cond.notify_all();
    }
}
