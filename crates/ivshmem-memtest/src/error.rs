// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Handshake errors.

use thiserror::Error;

/// Result alias for handshake operations.
pub type Result<T> = core::result::Result<T, HandshakeError>;

/// Why a handshake role stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// A device operation failed.
    #[error("device: {0}")]
    Device(#[from] ivshmem::Error),
    /// A bulk slot did not hold the expected pattern.
    #[error("verification mismatch at slot {index}: expected {expected:#010x}, found {found:#010x}")]
    VerificationMismatch {
        /// Slot index.
        index: usize,
        /// `index ^ seed`.
        expected: u32,
        /// Value read back.
        found: u32,
    },
    /// The window cannot hold the control record plus one slot group.
    #[error("window of {0} bytes is too small for the handshake")]
    WindowTooSmall(usize),
    /// The peer requested teardown.
    #[error("peer requested shutdown")]
    Shutdown,
}
