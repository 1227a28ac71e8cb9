// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Blocking wait primitives fed by the interrupt dispatcher.
//!
//! Both primitives share the same cancellation model, that of a pending
//! termination signal. [`Semaphore::interrupt`] or [`EventFlag::interrupt`]
//! cancels every waiter blocked at that moment; if nobody is blocked, the
//! cancellation stays pending and the next wait that would block consumes
//! it. A cancelled waiter returns [`WaitError::Interrupted`] and consumes
//! nothing; a wait that can be satisfied right away is never cancelled.
//! Closing a primitive is permanent and fails every current and future wait
//! with [`WaitError::Closed`].
//!
//! Signalling never blocks beyond a short internal lock, so both `up` and
//! `set` are safe to call from an interrupt handler.


mod event;
mod semaphore;

pub use event::EventFlag;
pub use semaphore::Semaphore;

use std::time::{Duration, Instant};

use crate::error::Error;

/// Why a wait returned without being satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitError {
    /// Cancelled through `interrupt`.
    Interrupted,
    /// The deadline passed.
    TimedOut,
    /// The primitive was closed.
    Closed,
}

impl From<WaitError> for Error {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Interrupted => Self::Interrupted,
            WaitError::TimedOut => Self::TimedOut,
            WaitError::Closed => Self::DeviceUnavailable,
        }
    }
}

/// Cancellation bookkeeping shared by both primitives.
///
/// Lives inside the primitive's mutex.
#[derive(Debug, Default)]
struct Cancel {
    /// Advanced to cancel the waiters blocked right now.
    epoch: u64,
    /// Set when a cancellation found nobody blocked.
    pending: bool,
    /// Waiters currently parked on the condition variable.
    blocked: usize,
}

impl Cancel {
    const fn request(&mut self) {
        if self.blocked == 0 {
            self.pending = true;
        } else {
            self.epoch = self.epoch.wrapping_add(1);
        }
    }

    /// Returns true if the waiter that started in `epoch` must give up.
    const fn take(&mut self, epoch: u64) -> bool {
        if self.epoch != epoch {
            return true;
        }
        let pending = self.pending;
        self.pending = false;
        pending
    }
}

/// Turn a relative timeout into an absolute deadline.
///
/// A timeout too large to represent is treated as no deadline.
#[must_use]
pub fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}
