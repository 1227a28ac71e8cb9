// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Mock register block for testing.
//!
//! This provides a register block backed by atomics, allowing unit tests to
//! set the status and position registers and inspect every doorbell written.

use core::sync::atomic::{AtomicU32, Ordering};

use ivshmem_abi::{DoorbellMessage, PeerId, Register};
use parking_lot::Mutex;

use super::RegisterBlock;

/// Mock register block.
#[derive(Debug, Default)]
pub struct MockRegisters {
    mask: AtomicU32,
    status: AtomicU32,
    position: AtomicU32,
    /// Every value written to the doorbell register, in order.
    doorbells: Mutex<Vec<DoorbellMessage>>,
}

impl MockRegisters {
    /// Create a register block reporting peer 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a register block reporting `peer` in `IvPosition`.
    #[must_use]
    pub fn with_position(peer: PeerId) -> Self {
        let regs = Self::default();
        regs.position.store(peer.as_u32(), Ordering::SeqCst);
        regs
    }

    /// Set the value the next `IntrStatus` read returns.
    pub fn set_status(&self, status: u32) {
        self.status.store(status, Ordering::SeqCst);
    }

    /// Current interrupt mask.
    #[must_use]
    pub fn mask(&self) -> u32 {
        self.mask.load(Ordering::SeqCst)
    }

    /// Doorbells written so far.
    #[must_use]
    pub fn doorbells(&self) -> Vec<DoorbellMessage> {
        self.doorbells.lock().clone()
    }

    /// Drain the doorbell log.
    pub fn take_doorbells(&self) -> Vec<DoorbellMessage> {
        core::mem::take(&mut *self.doorbells.lock())
    }
}

impl RegisterBlock for MockRegisters {
    fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::IntrMask => self.mask.load(Ordering::SeqCst),
            Register::IntrStatus => self.status.load(Ordering::SeqCst),
            Register::IvPosition => self.position.load(Ordering::SeqCst),
            // Write-only
            Register::Doorbell => 0,
        }
    }

    fn write(&self, reg: Register, value: u32) {
        match reg {
            Register::IntrMask => self.mask.store(value, Ordering::SeqCst),
            Register::Doorbell => self.doorbells.lock().push(DoorbellMessage::from_raw(value)),
            // Read-only
            Register::IntrStatus | Register::IvPosition => {}
        }
    }
}
