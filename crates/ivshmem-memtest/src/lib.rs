// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # ivshmem-memtest
//!
//! A two-role handshake over an ivshmem window, used to exercise the
//! doorbell path and the data window under load.
//!
//! The client always initiates; the server only reacts:
//!
//! ```text
//!   client                                   server
//!     │ data = seed, start = START              │
//!     ├──────── doorbell (event) ──────────────►│
//!     │                                         │ passes × write index ^ seed
//!     │                                         │ done = DONE
//!     │◄──────── doorbell (event) ──────────────┤
//!     │ passes × verify index ^ seed            │
//!     ▼ next round                              ▼ wait
//! ```
//!
//! Either side stops once the `shutdown` field of the control record is
//! set. The control record and the bulk slots share the window; see
//! [`ivshmem_abi::layout`].

pub mod bulk;
pub mod config;
pub mod error;
pub mod protocol;
pub mod report;
pub mod session;

pub use config::HandshakeConfig;
pub use error::{HandshakeError, Result};
pub use protocol::{Client, Server, Summary};
pub use report::Throughput;
pub use session::ControlSession;
