// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Register access abstraction.
//!
//! This module provides a trait over the device's register block, allowing
//! the driver to run against mapped hardware in production while using mock
//! implementations for testing on the development host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           Dispatcher / Control Plane                     │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                `RegisterBlock`                           │
//! └─────────────────────────────────────────────────────────┘
//!        │                     │                      │
//!        ▼                     ▼                      ▼
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │`MockRegisters`│   │ `loopback::Port` │   │ `MmioRegisters`  │
//! │ (unit tests) │   │ (peer emulation) │   │ (production)     │
//! └──────────────┘   └──────────────────┘   └──────────────────┘
//! ```
//!
//! Implementations perform no validation; every access is a single 32-bit
//! read or write, and accesses are not reordered with respect to each other.


mod mmio;
mod mock;

pub use mmio::MmioRegisters;
pub use mock::MockRegisters;

use ivshmem_abi::Register;

/// Access to the four 32-bit registers of one device.
///
/// Registers are hardware state, so both operations take `&self`.
pub trait RegisterBlock: Send + Sync {
    /// Read a register.
    fn read(&self, reg: Register) -> u32;

    /// Write a register.
    ///
    /// Writing [`Register::Doorbell`] notifies the peer named in the
    /// message; the notification itself is provided by the transport.
    fn write(&self, reg: Register, value: u32);
}
