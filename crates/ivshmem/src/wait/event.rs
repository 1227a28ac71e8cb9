// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Binary event flag.

use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use super::{Cancel, WaitError};

#[derive(Debug, Default)]
struct State {
    set: bool,
    cancel: Cancel,
    closed: bool,
}

/// Binary flag: `set` wakes every waiter, a successful `wait` clears it.
///
/// Several `set` calls before a `wait` coalesce into one.
#[derive(Debug, Default)]
pub struct EventFlag {
    state: Mutex<State>,
    cond: Condvar,
}

impl EventFlag {
    /// Create a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    pub fn set(&self) {
        let mut state = self.state.lock();
        state.set = true;
        drop(state);
        self.cond.notify_all();
    }

    /// Clear the flag without waking anyone.
    pub fn clear(&self) {
        self.state.lock().set = false;
    }

    /// Block until the flag is set, then clear it.
    ///
    /// Returns immediately if the flag is already set.
    pub fn wait(&self, deadline: Option<Instant>) -> Result<(), WaitError> {
        let mut state = self.state.lock();
        let epoch = state.cancel.epoch;
        loop {
            if state.closed {
                return Err(WaitError::Closed);
            }
            if state.set {
                state.set = false;
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
                if state.set && !state.closed {
                    state.set = false;
                    return Ok(());
                }
                return Err(WaitError::TimedOut);
            }
        }
    }

    /// Returns true if the flag is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.state.lock().set
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
