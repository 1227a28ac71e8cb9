// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Interrupt lines and scoped handler registration.
//!
//! A line may be shared by several handlers. The line only keeps a `Weak`
//! reference to each handler, so it never extends a device's lifetime, and
//! registration is tied to an [`IrqRegistration`] guard: dropping the guard
//! removes the handler.
//!
//! Handlers run with the line's handler table locked. This gives two
//! guarantees:
//! - a line never reenters a handler while it is running
//! - once `IrqRegistration` is dropped, the handler is not running and will
//!   not run again
//!
//! Handlers must therefore never block and never register or unregister on
//! their own line.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Weak;

use parking_lot::Mutex;
use tracing::trace;


/// Outcome of running an interrupt handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was not for this handler.
    None,
    /// The interrupt was consumed.
    Handled,
}

impl IrqReturn {
    /// Returns true if the interrupt was consumed.
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Code run in interrupt context when a line fires.
pub trait InterruptHandler: Send + Sync {
    /// Handle one interrupt.
    fn handle_interrupt(&self) -> IrqReturn;
}

struct Slot {
    token: u64,
    name: &'static str,
    handler: Weak<dyn InterruptHandler>,
}

/// One interrupt line (a legacy IRQ or an MSI-X vector).
pub struct IrqLine {
    number: u32,
    handlers: Mutex<Vec<Slot>>,
    next_token: AtomicU64,
}

impl IrqLine {
    /// Create a line with no handlers.
    #[must_use]
    pub fn new(number: u32) -> Arc<Self> {
        Arc::new(Self {
            number,
            handlers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        })
    }

    /// Line number, for diagnostics.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Register `handler` on this line.
    ///
    /// The line holds only a weak reference; the returned guard unregisters
    /// the handler when dropped.
    #[must_use = "dropping the registration unregisters the handler"]
    pub fn request<H>(self: &Arc<Self>, name: &'static str, handler: &Arc<H>) -> IrqRegistration
    where
        H: InterruptHandler + 'static,
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let weak: Weak<dyn InterruptHandler> = Arc::<H>::downgrade(handler);
        self.handlers.lock().push(Slot {
            token,
            name,
            handler: weak,
        });
        trace!(irq = self.number, handler = name, "handler registered");
        IrqRegistration {
            line: Arc::clone(self),
            token,
        }
    }

    /// Fire the line: run every live handler once.
    ///
    /// Returns `Handled` if any handler consumed the interrupt.
    pub fn raise(&self) -> IrqReturn {
        let handlers = self.handlers.lock();
        let mut result = IrqReturn::None;
        for slot in handlers.iter() {
            let Some(handler) = slot.handler.upgrade() else {
                continue;
            };
            if handler.handle_interrupt().is_handled() {
                result = IrqReturn::Handled;
            }
        }
        result
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    fn free(&self, token: u64) {
        let mut handlers = self.handlers.lock();
        if let Some(pos) = handlers.iter().position(|slot| slot.token == token) {
            let slot = handlers.remove(pos);
            trace!(irq = self.number, handler = slot.name, "handler freed");
        }
    }
}

impl core::fmt::Debug for IrqLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IrqLine")
            .field("number", &self.number)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Guard keeping a handler registered on a line.
pub struct IrqRegistration {
    line: Arc<IrqLine>,
    token: u64,
}

impl Drop for IrqRegistration {
    fn drop(&mut self) {
        self.line.free(self.token);
    }
}

impl core::fmt::Debug for IrqRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "IrqRegistration(irq {}, #{})", self.line.number, self.token)
    }
}
