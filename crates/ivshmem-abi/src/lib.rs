// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Wire contract of the inter-VM shared memory device.
//!
//! This crate defines everything two cooperating peers must agree on:
//! - Register offsets of the device's register block
//! - The doorbell command enumeration and 32-bit doorbell message format
//! - Peer identities as reported by the device
//! - The private layout of the control record at the start of the window
//!
//! # Design Principles
//!
//! - **No dependencies**: Pure data types, 100% host-testable (std and
//!   proptest only under test)
//! - **Fixed values**: Command codes and offsets are wire-compatible with
//!   existing peers and must never be renumbered
//!
//! # Modules
//!
//! - [`regs`]: Register block offsets
//! - [`command`]: Doorbell command enumeration
//! - [`doorbell`]: Doorbell message encoding and status classification
//! - [`layout`]: Control record layout inside the shared window

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod doorbell;
pub mod layout;
pub mod regs;
pub mod types;

// Re-export commonly used types at crate root
pub use command::Command;
pub use doorbell::{DoorbellMessage, StatusEvent};
pub use layout::ControlField;
pub use regs::Register;
pub use types::PeerId;
