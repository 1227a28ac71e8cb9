// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Per-device state and lifetime.
//!
//! A [`Device`] owns one attached device: its [`DeviceHandle`] plus the
//! registration of the handle's dispatcher on the interrupt line. Every
//! operation lives on the handle, which the device dereferences to.
//!
//! # Lifetime
//!
//! ```text
//! attach:  check registers ─► reset wait state ─► register dispatcher ─► unmask
//! detach:  unregister dispatcher ─► disable ─► release waiters
//! ```
//!
//! Once detach has begun the dispatcher never runs again, and every
//! operation on the handle fails with [`Error::DeviceUnavailable`].
//! Clones of the `Arc<DeviceHandle>` (streams, worker threads) stay valid
//! as memory but are unusable as a device.

#[cfg(test)]
mod control_test;
#[cfg(test)]
mod dispatch_test;

mod control;
mod data;
mod dispatch;

pub use control::{Request, Response};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use ivshmem_abi::regs::INTR_MASK_ALL;
use ivshmem_abi::{PeerId, Register};
use tracing::debug;

use crate::error::{Error, Result};
use crate::irq::{IrqLine, IrqRegistration};
use crate::platform::RegisterBlock;
use crate::wait::{EventFlag, Semaphore};
use crate::window::SharedWindow;

/// Resources handed over by whoever discovered and mapped the device.
#[derive(Clone, Default)]
pub struct DeviceResources {
    /// Mapped register block, if the mapping succeeded.
    pub registers: Option<Arc<dyn RegisterBlock>>,
    /// Mapped data window, if any.
    pub window: Option<SharedWindow>,
}

impl core::fmt::Debug for DeviceResources {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceResources")
            .field("registers", &self.registers.is_some())
            .field("window", &self.window)
            .finish()
    }
}

/// Snapshot of the outstanding signals of a device.
///
/// The two channels are independent: both may be pending at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pending {
    /// Current semaphore count.
    pub semaphore: u32,
    /// Whether the event flag is set.
    pub event: bool,
}

impl Pending {
    /// Returns true if neither channel has anything outstanding.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.semaphore == 0 && !self.event
    }
}

/// State of one attached device.
pub struct DeviceHandle {
    registers: Arc<dyn RegisterBlock>,
    window: Option<SharedWindow>,
    /// Resolved from `IvPosition` on first use.
    peer: OnceLock<PeerId>,
    semaphore: Semaphore,
    event: EventFlag,
    enabled: AtomicBool,
}

impl DeviceHandle {
    fn new(registers: Arc<dyn RegisterBlock>, window: Option<SharedWindow>) -> Self {
        Self {
            registers,
            window,
            peer: OnceLock::new(),
            semaphore: Semaphore::new(),
            event: EventFlag::new(),
            enabled: AtomicBool::new(false),
        }
    }

    /// Returns true between attach and detach.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(Error::DeviceUnavailable)
        }
    }

    fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.semaphore.close();
        self.event.close();
    }
}

impl core::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("peer", &self.peer.get())
            .field("window", &self.window)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

/// An attached device.
///
/// Dropping the device detaches it.
pub struct Device {
    handle: Arc<DeviceHandle>,
    irq: Option<IrqRegistration>,
}

impl Device {
    /// Attach a device and start dispatching its interrupts.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if the register block is missing.
    pub fn attach(resources: DeviceResources, line: &Arc<IrqLine>) -> Result<Self> {
        let Some(registers) = resources.registers else {
            debug!(irq = line.number(), "attach without register block");
            return Err(Error::DeviceUnavailable);
        };
        let handle = Arc::new(DeviceHandle::new(registers, resources.window));
        handle.semaphore.arm(0);
        handle.event.clear();
        handle.enabled.store(true, Ordering::Release);

        let irq = line.request("ivshmem", &handle);
        handle.registers.write(Register::IntrMask, INTR_MASK_ALL);
        debug!(
            irq = line.number(),
            window = handle.window.as_ref().map_or(0, SharedWindow::len),
            "device attached"
        );
        Ok(Self {
            handle,
            irq: Some(irq),
        })
    }

    /// Shared handle, for streams and threads that outlive a borrow.
    #[must_use]
    pub const fn handle(&self) -> &Arc<DeviceHandle> {
        &self.handle
    }

    /// Detach the device.
    ///
    /// Equivalent to dropping it.
    pub fn detach(self) {
        drop(self);
    }
}

impl core::ops::Deref for Device {
    type Target = DeviceHandle;

    fn deref(&self) -> &DeviceHandle {
        &self.handle
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // Unregister first: the dispatcher must not run on a disabled handle
        drop(self.irq.take());
        self.handle.disable();
        debug!(peer = ?self.handle.peer.get(), "device detached");
    }
}

impl core::fmt::Debug for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Device")
            .field("handle", &self.handle)
            .field("irq", &self.irq)
            .finish()
    }
}
