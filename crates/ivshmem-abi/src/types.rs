// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Peer identity.

use core::fmt;

/// Position of a peer on the shared memory bus.
///
/// The device reports it through the `IvPosition` register. Doorbell messages
/// carry the destination in their upper 16 bits, so a peer id is 16 bits wide.
/// Id 0 is a valid peer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct PeerId(u16);

impl PeerId {
    /// Creates a peer id.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Creates a peer id from a raw `IvPosition` register value.
    ///
    /// Only the low 16 bits are meaningful on the wire.
    #[inline]
    #[must_use]
    pub const fn from_register(raw: u32) -> Self {
        Self(raw as u16)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the id widened to a register value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer:{}", self.0)
    }
}

impl From<u16> for PeerId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}
