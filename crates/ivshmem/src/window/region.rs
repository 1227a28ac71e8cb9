// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Backing memory for the shared window.

use core::ptr::NonNull;

/// A contiguous block of memory shared with other peers.
///
/// # Safety
///
/// Implementors guarantee that `base()` points to `len()` bytes that stay
/// valid for reads and writes, from any thread, for as long as the region
/// is alive, and that `base()` is aligned to at least 4 bytes. The memory
/// may be written concurrently by other peers, so no Rust reference to it
/// may ever be handed out.
pub unsafe trait SharedRegion: Send + Sync {
    /// Start of the region.
    fn base(&self) -> NonNull<u8>;

    /// Size of the region in bytes.
    fn len(&self) -> usize;

    /// Returns true if the region has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Zero-initialized region on the heap, used by the loopback interconnect.
pub struct HeapRegion {
    words: NonNull<[u64]>,
    len: usize,
}

// SAFETY: The allocation is owned by this value and only ever accessed
// through raw pointers.
unsafe impl Send for HeapRegion {}
// SAFETY: See above.
unsafe impl Sync for HeapRegion {}

impl HeapRegion {
    /// Allocate `len` zeroed bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let words = vec![0u64; len.div_ceil(8)].into_boxed_slice();
        // The box is turned into a raw pointer so that no unique reference
        // exists while peers access the memory.
        let words = NonNull::from(Box::leak(words));
        Self { words, len }
    }
}

impl Drop for HeapRegion {
    fn drop(&mut self) {
        // SAFETY: `words` came from `Box::leak` in `new` and is released
        // exactly once.
        drop(unsafe { Box::from_raw(self.words.as_ptr()) });
    }
}

// SAFETY: The allocation holds at least `len` bytes, is 8-byte aligned and
// lives until drop.
unsafe impl SharedRegion for HeapRegion {
    fn base(&self) -> NonNull<u8> {
        self.words.cast()
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl core::fmt::Debug for HeapRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "HeapRegion({} bytes)", self.len)
    }
}

/// Region behind an externally established mapping (BAR2 in production).
pub struct MmioRegion {
    base: NonNull<u8>,
    len: usize,
}

// SAFETY: The mapping is process-wide memory accessed only through raw
// pointers.
unsafe impl Send for MmioRegion {}
// SAFETY: See above.
unsafe impl Sync for MmioRegion {}

impl MmioRegion {
    /// Wrap a mapped window.
    ///
    /// Returns `None` for a null or misaligned base.
    ///
    /// # Safety
    ///
    /// `base` must point to `len` bytes of mapped memory that stays mapped
    /// for the lifetime of the returned value.
    #[must_use]
    pub unsafe fn new(base: *mut u8, len: usize) -> Option<Self> {
        let base = NonNull::new(base)?;
        if base.as_ptr().align_offset(core::mem::align_of::<u32>()) != 0 {
            return None;
        }
        Some(Self { base, len })
    }
}

// SAFETY: Upheld by the contract of `MmioRegion::new`.
unsafe impl SharedRegion for MmioRegion {
    fn base(&self) -> NonNull<u8> {
        self.base
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl core::fmt::Debug for MmioRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MmioRegion({:p}, {} bytes)", self.base, self.len)
    }
}
