// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Driver error taxonomy.
//!
//! Truncated data-plane transfers are not errors: they return the number of
//! bytes actually moved.

use std::io;

use thiserror::Error;

/// Result alias used throughout the driver.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by device operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The device is detached, was never attached, or lacks the resource.
    #[error("device unavailable")]
    DeviceUnavailable,
    /// A blocking wait was cancelled before it was signalled.
    #[error("wait interrupted")]
    Interrupted,
    /// A wait with a deadline expired.
    #[error("wait timed out")]
    TimedOut,
    /// The raw command number is unknown or has no implementation.
    #[error("unsupported command {0}")]
    UnsupportedCommand(u32),
    /// A seek would move before the start of the window.
    #[error("seek before start of window")]
    InvalidSeek,
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::DeviceUnavailable => io::ErrorKind::NotConnected,
            Error::Interrupted => io::ErrorKind::Interrupted,
            Error::TimedOut => io::ErrorKind::TimedOut,
            Error::UnsupportedCommand(_) => io::ErrorKind::Unsupported,
            Error::InvalidSeek => io::ErrorKind::InvalidInput,
        };
        Self::new(kind, err)
    }
}
