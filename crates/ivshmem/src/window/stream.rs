// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Byte-stream cursor over a device's window.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use crate::device::DeviceHandle;
use crate::error::Error;

/// File-like cursor over the data window of one device.
///
/// The position never exceeds the window size; reads and writes at the end
/// transfer zero bytes.
#[derive(Debug)]
pub struct Stream {
    handle: Arc<DeviceHandle>,
    position: u64,
}

impl Stream {
    pub(crate) const fn new(handle: Arc<DeviceHandle>) -> Self {
        Self { handle, position: 0 }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    fn offset(&self) -> usize {
        usize::try_from(self.position).unwrap_or(usize::MAX)
    }

    fn advance(&mut self, count: usize) {
        self.position = self.position.saturating_add(count as u64);
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.handle.read_into(self.offset(), buf)?;
        self.advance(count);
        Ok(count)
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let count = self.handle.write(self.offset(), buf)?;
        self.advance(count);
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let size = self.handle.window_size()? as u64;
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => size.checked_add_signed(delta),
        };
        let target = target.ok_or(Error::InvalidSeek)?;
        self.position = target.min(size);
        Ok(self.position)
    }
}
