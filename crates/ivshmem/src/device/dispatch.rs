// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Interrupt dispatcher.
//!
//! The only code that signals the semaphore or sets the event flag.

use ivshmem_abi::{Register, StatusEvent};
use tracing::{trace, warn};

use super::DeviceHandle;
use crate::irq::{InterruptHandler, IrqReturn};

impl InterruptHandler for DeviceHandle {
    fn handle_interrupt(&self) -> IrqReturn {
        if !self.is_enabled() {
            return IrqReturn::None;
        }
        let status = self.registers.read(Register::IntrStatus);
        trace!(status = format_args!("{status:#010x}"), "interrupt");
        match StatusEvent::classify(status) {
            StatusEvent::Spurious => {
                warn!(status = format_args!("{status:#010x}"), "spurious interrupt");
                return IrqReturn::None;
            }
            StatusEvent::Semaphore => self.semaphore.up(),
            StatusEvent::Event => self.event.set(),
            StatusEvent::Unrecognized(status) => {
                warn!(status = format_args!("{status:#010x}"), "unrecognized doorbell ignored");
            }
        }
        IrqReturn::Handled
    }
}
