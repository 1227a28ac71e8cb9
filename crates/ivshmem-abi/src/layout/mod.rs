// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Control record layout inside the shared window.
//!
//! The handshake protocol keeps a small record at offset 0 of the window,
//! followed by the bulk test area. This layout is a convention between
//! cooperating peers, not a stabilized protocol.
//!
//! ```text
//! offset 0x00  iv_server   published server id
//! offset 0x04  iv_client   published client id
//! offset 0x08  ready       READY once the server listens
//! offset 0x0C  start       START while a round is requested
//! offset 0x10  data        seed of the current round
//! offset 0x14  done        DONE once the server finished a round
//! offset 0x18  shutdown    non-zero tears the session down
//! offset 0x1C  slot[0] ... bulk area, u32 slots
//! ```

use crate::types::PeerId;


/// Value of `start` while the client requests a round.
pub const START: u32 = 0x1111_1111;

/// Value of `ready` once the server is listening.
pub const READY: u32 = 0x5555_5555;

/// Value of `done` once the server completed a round.
pub const DONE: u32 = 0x9999_9999;

/// Low byte tagging a published peer id.
pub const PUBLISHED_TAG: u32 = 0x5A;

/// Size of one bulk slot in bytes.
pub const SLOT_SIZE: usize = 4;

/// A `u32` field of the control record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ControlField {
    /// Published server id.
    IvServer = 0,
    /// Published client id.
    IvClient = 1,
    /// Server readiness marker.
    Ready = 2,
    /// Round request marker.
    Start = 3,
    /// Seed of the current round.
    Data = 4,
    /// Round completion marker.
    Done = 5,
    /// Teardown flag.
    Shutdown = 6,
}

impl ControlField {
    /// Number of fields in the record.
    pub const COUNT: usize = 7;

    /// Byte offset of the field from the start of the window.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        self as usize * SLOT_SIZE
    }
}

/// Size of the control record in bytes.
pub const CONTROL_RECORD_SIZE: usize = ControlField::COUNT * SLOT_SIZE;

/// Encodes a peer id for `iv_server` / `iv_client`.
#[inline]
#[must_use]
pub const fn encode_published(peer: PeerId) -> u32 {
    (peer.as_u32() << 16) | PUBLISHED_TAG
}

/// Decodes a published peer id; `None` if the field was never published.
#[inline]
#[must_use]
pub const fn decode_published(raw: u32) -> Option<PeerId> {
    if raw & 0xFFFF != PUBLISHED_TAG {
        return None;
    }
    Some(PeerId::new((raw >> 16) as u16))
}

/// Number of usable bulk slots in a window of `window_size` bytes.
///
/// Rounded down to a multiple of four slots.
#[must_use]
pub const fn slot_count(window_size: usize) -> usize {
    if window_size <= CONTROL_RECORD_SIZE {
        return 0;
    }
    let slots = (window_size - CONTROL_RECORD_SIZE) / SLOT_SIZE;
    slots & !(SLOT_SIZE - 1)
}

/// Byte offset of bulk slot `index`.
#[inline]
#[must_use]
pub const fn slot_offset(index: usize) -> usize {
    CONTROL_RECORD_SIZE + index * SLOT_SIZE
}

/// Value expected in bulk slot `index` for a round seeded with `seed`.
#[inline]
#[must_use]
pub const fn pattern(index: usize, seed: u32) -> u32 {
    (index as u32) ^ seed
}
