// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Doorbell messages and interrupt status classification.
//!
//! # Message Layout
//!
//! | Bits  | Content                      |
//! |-------|------------------------------|
//! | 31-16 | destination `PeerId`         |
//! | 15-8  | zero                         |
//! | 7-0   | operation code (`Command`)   |
//!
//! The receiving device latches the low half of the message into its
//! `IntrStatus` register and raises an interrupt.

use crate::command::Command;
use crate::regs::STATUS_INVALID;
use crate::types::PeerId;
use core::fmt;

#[cfg(test)]
mod doorbell_test;

/// Shift of the destination field.
pub const DESTINATION_SHIFT: u32 = 16;

/// Mask of the operation code field.
pub const CODE_MASK: u32 = 0xFF;

/// A 32-bit value written to the doorbell register.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DoorbellMessage(u32);

impl DoorbellMessage {
    /// Composes a message ringing `destination` with `command`.
    #[inline]
    #[must_use]
    pub const fn new(destination: PeerId, command: Command) -> Self {
        Self((destination.as_u32() << DESTINATION_SHIFT) | command.code() as u32)
    }

    /// Wraps a raw register value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw register value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the peer the message is addressed to.
    #[inline]
    #[must_use]
    pub const fn destination(self) -> PeerId {
        PeerId::new((self.0 >> DESTINATION_SHIFT) as u16)
    }

    /// Returns the raw operation code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        (self.0 & CODE_MASK) as u8
    }

    /// Returns the operation code, if it is part of the enumeration.
    #[inline]
    #[must_use]
    pub const fn command(self) -> Option<Command> {
        Command::from_u8(self.code())
    }

    /// Returns the value the destination device latches into `IntrStatus`.
    #[inline]
    #[must_use]
    pub const fn status(self) -> u32 {
        self.0 & 0xFFFF
    }
}

impl fmt::Debug for DoorbellMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command() {
            Some(cmd) => write!(f, "Doorbell({} <- {cmd})", self.destination()),
            None => write!(f, "Doorbell({} <- code {})", self.destination(), self.code()),
        }
    }
}

/// Classification of an `IntrStatus` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    /// Zero or all-ones: nothing to dispatch.
    Spurious,
    /// A semaphore-channel doorbell arrived.
    Semaphore,
    /// An event-channel doorbell arrived.
    Event,
    /// A doorbell with a code that signals neither channel.
    Unrecognized(u32),
}

impl StatusEvent {
    /// Classifies a raw status register value.
    #[must_use]
    pub const fn classify(status: u32) -> Self {
        if status == 0 || status == STATUS_INVALID {
            return Self::Spurious;
        }
        match Command::from_u8((status & CODE_MASK) as u8) {
            Some(cmd) if cmd.signals_semaphore() => Self::Semaphore,
            Some(cmd) if cmd.signals_event() => Self::Event,
            _ => Self::Unrecognized(status),
        }
    }

    /// Returns true unless the status was spurious.
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        !matches!(self, Self::Spurious)
    }
}
