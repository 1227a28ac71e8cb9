// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The shared data window.
//!
//! Every access is bounded by the window size. Transfers that would run
//! past the end are truncated, never rejected; callers needing strict
//! bounds compare the returned count with what they asked for.
//!
//! Concurrent access by different peers is not coordinated here. The
//! handshake protocol orders its accesses through doorbells.


mod mapping;
mod region;
mod stream;

pub use mapping::Mapping;
pub use region::{HeapRegion, MmioRegion, SharedRegion};
pub use stream::Stream;

use std::sync::Arc;

/// Handle to a shared window; clones refer to the same memory.
#[derive(Clone)]
pub struct SharedWindow {
    region: Arc<dyn SharedRegion>,
}

impl SharedWindow {
    /// Wrap a region.
    #[must_use]
    pub fn new(region: Arc<dyn SharedRegion>) -> Self {
        Self { region }
    }

    /// A zeroed heap-backed window of `len` bytes.
    #[must_use]
    pub fn heap(len: usize) -> Self {
        Self::new(Arc::new(HeapRegion::new(len)))
    }

    /// Window size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.region.len()
    }

    /// Returns true if the window has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Bytes available from `offset` to the end, capped at `wanted`.
    fn span(&self, offset: usize, wanted: usize) -> usize {
        self.len().saturating_sub(offset).min(wanted)
    }

    /// Copy from the window at `offset` into `buf`.
    ///
    /// Returns the number of bytes copied, zero at or past the end.
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        let count = self.span(offset, buf.len());
        if count > 0 {
            // SAFETY: `offset + count <= len`, and `buf` is a distinct Rust
            // allocation so the ranges cannot overlap.
            unsafe {
                let src = self.region.base().as_ptr().add(offset);
                core::ptr::copy_nonoverlapping(src, buf.as_mut_ptr(), count);
            }
        }
        count
    }

    /// Copy `data` into the window at `offset`.
    ///
    /// Returns the number of bytes copied, zero at or past the end.
    pub fn write_at(&self, offset: usize, data: &[u8]) -> usize {
        let count = self.span(offset, data.len());
        if count > 0 {
            // SAFETY: As in `read_at`.
            unsafe {
                let dst = self.region.base().as_ptr().add(offset);
                core::ptr::copy_nonoverlapping(data.as_ptr(), dst, count);
            }
        }
        count
    }

    /// Map the whole window.
    #[must_use]
    pub fn mapping(&self) -> Mapping {
        Mapping::new(Arc::clone(&self.region))
    }
}

impl core::fmt::Debug for SharedWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SharedWindow({} bytes)", self.len())
    }
}
