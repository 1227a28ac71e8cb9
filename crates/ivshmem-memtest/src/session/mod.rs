// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The control record at the start of the shared window.
//!
//! Fields are little-endian 32-bit words accessed one at a time through
//! the mapping's atomic accessors, so each read or write is a single
//! access visible to the other peer.

#[cfg(test)]
mod session_test;

use ivshmem::Mapping;
use ivshmem_abi::PeerId;
use ivshmem_abi::layout::{self, ControlField, DONE, READY, START};
use tracing::warn;

use crate::error::{HandshakeError, Result};

/// View of the control record and bulk area of one window.
#[derive(Clone, Debug)]
pub struct ControlSession {
    mapping: Mapping,
    slots: usize,
}

impl ControlSession {
    /// Wrap a mapped window.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::WindowTooSmall`] if no bulk slot fits after the
    /// control record.
    pub fn new(mapping: Mapping) -> Result<Self> {
        let slots = layout::slot_count(mapping.len());
        if slots == 0 {
            return Err(HandshakeError::WindowTooSmall(mapping.len()));
        }
        Ok(Self { mapping, slots })
    }

    /// Number of bulk slots.
    #[must_use]
    pub const fn slots(&self) -> usize {
        self.slots
    }

    /// The underlying mapping.
    #[must_use]
    pub const fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Read a control field.
    #[must_use]
    pub fn get(&self, field: ControlField) -> u32 {
        self.mapping
            .load_u32(field.offset())
            .map_or(0, u32::from_le)
    }

    /// Write a control field.
    pub fn set(&self, field: ControlField, value: u32) {
        if !self.mapping.store_u32(field.offset(), value.to_le()) {
            warn!(?field, "control field outside window");
        }
    }

    /// Publish the server's peer id.
    pub fn publish_server(&self, peer: PeerId) {
        self.set(ControlField::IvServer, layout::encode_published(peer));
    }

    /// Publish the client's peer id.
    pub fn publish_client(&self, peer: PeerId) {
        self.set(ControlField::IvClient, layout::encode_published(peer));
    }

    /// The published server, if any.
    #[must_use]
    pub fn server(&self) -> Option<PeerId> {
        layout::decode_published(self.get(ControlField::IvServer))
    }

    /// The published client, if any.
    #[must_use]
    pub fn client(&self) -> Option<PeerId> {
        layout::decode_published(self.get(ControlField::IvClient))
    }

    /// Returns true once the server has announced readiness.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.get(ControlField::Ready) == READY
    }

    /// Returns true while a round request is pending.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.get(ControlField::Start) == START
    }

    /// Returns true once the server has finished the current round.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.get(ControlField::Done) == DONE
    }

    /// Returns true once either side requested teardown.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.get(ControlField::Shutdown) != 0
    }

    /// Request teardown.
    pub fn request_shutdown(&self) {
        self.set(ControlField::Shutdown, 1);
    }

    /// Byte offset of bulk slot `index`, if it exists.
    #[must_use]
    pub const fn slot_offset(&self, index: usize) -> Option<usize> {
        if index < self.slots {
            Some(layout::slot_offset(index))
        } else {
            None
        }
    }

    /// Read bulk slot `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<u32> {
        self.mapping
            .load_u32(self.slot_offset(index)?)
            .map(u32::from_le)
    }

    /// Write bulk slot `index`; returns false if it does not exist.
    pub fn set_slot(&self, index: usize, value: u32) -> bool {
        self.slot_offset(index)
            .is_some_and(|offset| self.mapping.store_u32(offset, value.to_le()))
    }
}
