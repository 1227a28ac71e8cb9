// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Doorbell command enumeration.
//!
//! The same numbering serves two purposes: it is the command space of the
//! device-like control API, and its low byte is the operation code carried in
//! a doorbell message. Values are fixed for wire compatibility.

use core::fmt;

/// Control command / doorbell operation code.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Arm the semaphore with an initial count.
    SetSema = 0,
    /// Block until the semaphore can be decremented.
    DownSema = 1,
    /// Ring a peer on the semaphore channel (historical name).
    Empty = 2,
    /// Block until the event flag is set.
    WaitEvent = 3,
    /// Ring a peer on the event channel.
    WaitEventIrq = 4,
    /// Read this peer's position.
    ReadIvPosn = 5,
    /// Read the list of live peers (reserved, unimplemented by devices).
    ReadLivelist = 6,
    /// Ring a peer on the semaphore channel.
    SemaIrq = 7,
}

impl Command {
    /// Every command in numeric order.
    pub const ALL: [Self; 8] = [
        Self::SetSema,
        Self::DownSema,
        Self::Empty,
        Self::WaitEvent,
        Self::WaitEventIrq,
        Self::ReadIvPosn,
        Self::ReadLivelist,
        Self::SemaIrq,
    ];

    /// Try to convert from a raw operation code.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::SetSema),
            1 => Some(Self::DownSema),
            2 => Some(Self::Empty),
            3 => Some(Self::WaitEvent),
            4 => Some(Self::WaitEventIrq),
            5 => Some(Self::ReadIvPosn),
            6 => Some(Self::ReadLivelist),
            7 => Some(Self::SemaIrq),
            _ => None,
        }
    }

    /// Try to convert from a raw 32-bit command number.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        if value > u8::MAX as u32 {
            return None;
        }
        Self::from_u8(value as u8)
    }

    /// Returns the raw operation code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if this command writes the doorbell register.
    #[inline]
    #[must_use]
    pub const fn is_ring(self) -> bool {
        matches!(self, Self::Empty | Self::WaitEventIrq | Self::SemaIrq)
    }

    /// Returns true if a doorbell with this code signals the semaphore channel.
    #[inline]
    #[must_use]
    pub const fn signals_semaphore(self) -> bool {
        matches!(self, Self::SemaIrq)
    }

    /// Returns true if a doorbell with this code signals the event channel.
    #[inline]
    #[must_use]
    pub const fn signals_event(self) -> bool {
        matches!(self, Self::WaitEventIrq)
    }

    /// Short wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetSema => "set_sema",
            Self::DownSema => "down_sema",
            Self::Empty => "empty",
            Self::WaitEvent => "wait_event",
            Self::WaitEventIrq => "wait_event_irq",
            Self::ReadIvPosn => "read_ivposn",
            Self::ReadLivelist => "read_livelist",
            Self::SemaIrq => "sema_irq",
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Compile-time verification of the wire numbering
const _: () = {
    assert!(Command::SetSema.code() == 0);
    assert!(Command::DownSema.code() == 1);
    assert!(Command::Empty.code() == 2);
    assert!(Command::WaitEvent.code() == 3);
    assert!(Command::WaitEventIrq.code() == 4);
    assert!(Command::ReadIvPosn.code() == 5);
    assert!(Command::ReadLivelist.code() == 6);
    assert!(Command::SemaIrq.code() == 7);
};
