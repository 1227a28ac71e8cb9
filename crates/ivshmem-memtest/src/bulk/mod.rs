// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Bulk write and verify passes over the slot area.
//!
//! Passes touch every slot with plain volatile accesses through the raw
//! mapping. The handshake guarantees that only one side works on the slots
//! at a time: the server between `start` and its completion doorbell, the
//! client after it.

#[cfg(test)]
mod bulk_test;

use core::ptr::{read_volatile, write_volatile};

use ivshmem_abi::layout::{self, pattern};

use crate::error::HandshakeError;
use crate::session::ControlSession;

#[allow(clippy::cast_ptr_alignment)] // alignment checked by the window contract
fn slot_base(session: &ControlSession) -> *mut u32 {
    // SAFETY: The control record lies inside the mapping, which
    // `ControlSession::new` checked holds at least one slot after it.
    unsafe { session.mapping().as_ptr().add(layout::CONTROL_RECORD_SIZE).cast() }
}

/// Write `index ^ seed` into every slot.
///
/// Returns the number of slots written.
pub fn write_pass(session: &ControlSession, seed: u32) -> u64 {
    let base = slot_base(session);
    for index in 0..session.slots() {
        // SAFETY: `index < slots`, and the slots fit in the mapping. The
        // base is 4-aligned because the window base and the record size
        // both are.
        unsafe { write_volatile(base.add(index), pattern(index, seed).to_le()) };
    }
    session.slots() as u64
}

/// Check that every slot holds `index ^ seed`.
///
/// Stops at the first slot that does not.
///
/// # Errors
///
/// [`HandshakeError::VerificationMismatch`] naming the first bad slot.
pub fn verify_pass(session: &ControlSession, seed: u32) -> Result<u64, HandshakeError> {
    let base = slot_base(session);
    for index in 0..session.slots() {
        // SAFETY: As in `write_pass`.
        let found = u32::from_le(unsafe { read_volatile(base.add(index)) });
        let expected = pattern(index, seed);
        if found != expected {
            return Err(HandshakeError::VerificationMismatch {
                index,
                expected,
                found,
            });
        }
    }
    Ok(session.slots() as u64)
}
