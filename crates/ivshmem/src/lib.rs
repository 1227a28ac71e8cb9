// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # ivshmem
//!
//! Driver core for the inter-VM shared memory device.
//!
//! A region of memory is shared between independent peers; each peer can
//! ring a doorbell addressed at another peer, which raises an interrupt on
//! the receiving side. This crate turns that raw interface into a blocking
//! IPC primitive:
//! - [`platform`]: register access (`MmioRegisters` in production,
//!   `MockRegisters` on the host)
//! - [`irq`]: interrupt lines with scoped handler registration
//! - [`wait`]: the counting semaphore and event flag fed by interrupts
//! - [`device`]: the per-device handle, its dispatcher and the control plane
//! - [`window`]: bounded byte access and direct mapping of the shared window
//! - [`loopback`]: an in-process interconnect for host testing
//!
//! ## Architecture
//!
//! ```text
//!   control plane ──ring()──► Doorbell register ──► peer's interrupt line
//!        │                                                  │
//!   down()/wait_event()                              dispatcher
//!        │                                                  │
//!        └──────── Semaphore / EventFlag ◄──────────────────┘
//! ```
//!
//! The dispatcher is the only code that signals the wait primitives.

pub mod device;
pub mod error;
pub mod irq;
pub mod loopback;
pub mod platform;
pub mod wait;
pub mod window;

pub use ivshmem_abi as abi;

// Re-export commonly used types at crate root
pub use device::{Device, DeviceHandle, DeviceResources, Pending, Request, Response};
pub use error::{Error, Result};
pub use irq::{InterruptHandler, IrqLine, IrqRegistration, IrqReturn};
pub use ivshmem_abi::{Command, DoorbellMessage, PeerId};
pub use loopback::Fabric;
pub use platform::{MmioRegisters, MockRegisters, RegisterBlock};
pub use window::{HeapRegion, Mapping, MmioRegion, SharedRegion, SharedWindow, Stream};
