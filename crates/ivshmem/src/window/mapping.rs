// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Direct mapping of the whole window.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::SharedRegion;

/// The entire shared window as directly addressable memory.
///
/// A mapping keeps the underlying region alive. Other peers may write the
/// memory at any time, so the mapping never hands out Rust references:
/// callers either use the checked 32-bit accessors or take the raw pointer
/// and accept the aliasing obligations that come with it.
#[derive(Clone)]
pub struct Mapping {
    region: Arc<dyn SharedRegion>,
}

impl Mapping {
    pub(super) fn new(region: Arc<dyn SharedRegion>) -> Self {
        Self { region }
    }

    /// Size of the mapping in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.region.len()
    }

    /// Returns true if the mapping has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Raw start of the window.
    ///
    /// Dereferencing the pointer is the caller's responsibility: stay within
    /// `len()` bytes and coordinate with the other peers.
    #[must_use]
    pub fn as_ptr(&self) -> *mut u8 {
        self.region.base().as_ptr()
    }

    #[allow(clippy::cast_ptr_alignment)] // offset and base are 4-aligned
    fn word(&self, offset: usize) -> Option<&AtomicU32> {
        if offset % 4 != 0 || offset.checked_add(4)? > self.len() {
            return None;
        }
        // SAFETY: In bounds and 4-aligned (the region base is 4-aligned by
        // the `SharedRegion` contract). Every access goes through atomics.
        Some(unsafe { AtomicU32::from_ptr(self.as_ptr().add(offset).cast()) })
    }

    /// Load the 32-bit word at `offset`.
    ///
    /// Returns `None` if `offset` is misaligned or out of bounds.
    #[must_use]
    pub fn load_u32(&self, offset: usize) -> Option<u32> {
        self.word(offset).map(|word| word.load(Ordering::SeqCst))
    }

    /// Store `value` into the 32-bit word at `offset`.
    ///
    /// Returns false if `offset` is misaligned or out of bounds.
    #[must_use = "a rejected store writes nothing"]
    pub fn store_u32(&self, offset: usize, value: u32) -> bool {
        self.word(offset).map(|word| word.store(value, Ordering::SeqCst)).is_some()
    }
}

impl core::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mapping({:p}, {} bytes)", self.as_ptr(), self.len())
    }
}
