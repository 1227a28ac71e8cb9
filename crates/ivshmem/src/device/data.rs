// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Data plane: bounded transfers and direct mapping.

use std::sync::Arc;

use tracing::trace;

use super::DeviceHandle;
use crate::error::{Error, Result};
use crate::window::{Mapping, SharedWindow, Stream};

impl DeviceHandle {
    fn window(&self) -> Result<&SharedWindow> {
        self.ensure_enabled()?;
        self.window.as_ref().ok_or(Error::DeviceUnavailable)
    }

    /// Size of the data window in bytes.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if detached or no window is mapped.
    pub fn window_size(&self) -> Result<usize> {
        self.window().map(SharedWindow::len)
    }

    /// Read up to `len` bytes at `offset`.
    ///
    /// The result is truncated at the end of the window and empty at or
    /// past it.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if detached or no window is mapped.
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let window = self.window()?;
        let mut buf = vec![0; len.min(window.len().saturating_sub(offset))];
        let count = window.read_at(offset, &mut buf);
        buf.truncate(count);
        trace!(offset, requested = len, count, "window read");
        Ok(buf)
    }

    /// Read into `buf` at `offset`, returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if detached or no window is mapped.
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<usize> {
        let count = self.window()?.read_at(offset, buf);
        trace!(offset, requested = buf.len(), count, "window read");
        Ok(count)
    }

    /// Write `data` at `offset`, returning the number of bytes written.
    ///
    /// Bytes that would land past the end of the window are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if detached or no window is mapped.
    pub fn write(&self, offset: usize, data: &[u8]) -> Result<usize> {
        let count = self.window()?.write_at(offset, data);
        trace!(offset, requested = data.len(), count, "window write");
        Ok(count)
    }

    /// Map the whole window for direct access.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if detached or no window is mapped.
    pub fn map(&self) -> Result<Mapping> {
        self.window().map(SharedWindow::mapping)
    }

    /// A stream cursor at the start of the window.
    #[must_use]
    pub fn stream(self: &Arc<Self>) -> Stream {
        Stream::new(Arc::clone(self))
    }
}
