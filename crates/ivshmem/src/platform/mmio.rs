// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Memory-mapped register block.
//!
//! Uses volatile accesses on an uncached mapping of BAR0. Mapping the BAR is
//! the caller's job; this type only needs the resulting virtual address.

use core::ptr::{NonNull, read_volatile, write_volatile};
use core::sync::atomic::{Ordering, fence};

use ivshmem_abi::Register;

use super::RegisterBlock;

/// Register block behind a mapped MMIO region.
pub struct MmioRegisters {
    /// Virtual address of the mapped register block.
    base: NonNull<u32>,
}

// SAFETY: The mapping is device memory; every access is a single volatile
// 32-bit operation, which the device serializes.
unsafe impl Send for MmioRegisters {}
// SAFETY: See above. No Rust-visible state is shared.
unsafe impl Sync for MmioRegisters {}

impl MmioRegisters {
    /// Wrap a mapped register block.
    ///
    /// Returns `None` for a null or misaligned base.
    ///
    /// # Safety
    ///
    /// `base` must point to at least `REGISTER_BLOCK_SIZE` bytes of mapped,
    /// uncached device memory that stays mapped for the lifetime of the
    /// returned value.
    #[must_use]
    pub unsafe fn new(base: *mut u8) -> Option<Self> {
        let base = NonNull::new(base)?;
        if base.as_ptr().align_offset(core::mem::align_of::<u32>()) != 0 {
            return None;
        }
        Some(Self { base: base.cast() })
    }

    fn register_ptr(&self, reg: Register) -> *mut u32 {
        // SAFETY: Every register index lies inside REGISTER_BLOCK_SIZE,
        // which the constructor's contract guarantees is mapped.
        unsafe { self.base.as_ptr().add(reg.index()) }
    }
}

impl RegisterBlock for MmioRegisters {
    fn read(&self, reg: Register) -> u32 {
        // SAFETY: register_ptr is in bounds and aligned.
        unsafe { read_volatile(self.register_ptr(reg)) }
    }

    fn write(&self, reg: Register, value: u32) {
        // SAFETY: register_ptr is in bounds and aligned.
        unsafe { write_volatile(self.register_ptr(reg), value) };
        // Complete the write before the next register operation begins
        fence(Ordering::SeqCst);
    }
}

impl core::fmt::Debug for MmioRegisters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MmioRegisters({:p})", self.base)
    }
}
