// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Register block of the shared memory device.
//!
//! Four 32-bit registers at fixed offsets; the shared memory window is
//! mapped separately.
//!
//! | Offset | Register     | Access |
//! |--------|--------------|--------|
//! | 0x00   | `IntrMask`   | RW     |
//! | 0x04   | `IntrStatus` | RO     |
//! | 0x08   | `IvPosition` | RO     |
//! | 0x0C   | `Doorbell`   | WO     |

/// Bytes of the register block that must be mapped to reach every register.
pub const REGISTER_BLOCK_SIZE: usize = 0x100;

/// Interrupt mask value enabling every interrupt source.
pub const INTR_MASK_ALL: u32 = 0xFFFF_FFFF;

/// Status value read back from a device that has gone away.
pub const STATUS_INVALID: u32 = 0xFFFF_FFFF;

/// A 32-bit register in the device's register block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Register {
    /// Interrupt mask.
    IntrMask = 0x00,
    /// Interrupt status; holds the code of the last doorbell received.
    IntrStatus = 0x04,
    /// This peer's position (identity) on the shared memory bus.
    IvPosition = 0x08,
    /// Doorbell; writing rings the peer named in the message.
    Doorbell = 0x0C,
}

impl Register {
    /// Byte offset from the start of the register block.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// Index of the register when the block is viewed as `[u32]`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.offset() / 4
    }
}

// Compile-time verification of the register map
const _: () = {
    assert!(Register::IntrMask.offset() == 0x00);
    assert!(Register::IntrStatus.offset() == 0x04);
    assert!(Register::IvPosition.offset() == 0x08);
    assert!(Register::Doorbell.offset() == 0x0C);
    assert!(Register::Doorbell.offset() + 4 <= REGISTER_BLOCK_SIZE);
};
