// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The two handshake roles.
//!
//! # Readiness
//!
//! Both sides publish their peer id before looking at the other side. The
//! server then sets `ready`; whichever side sees the other one already
//! published sends the first doorbell:
//! - the server finds a client: it rings the client ("ready")
//! - the client finds `ready`: it rings the server ("hello"), and the
//!   server answers with its "ready" doorbell if it has not sent it yet
//!
//! The client therefore receives exactly one readiness doorbell.
//!
//! # Rounds
//!
//! Event doorbells may coalesce, so neither side counts them. The server
//! recognizes a round request by `start == START`, the client recognizes
//! completion by `done == DONE`; any other wake-up is ignored.
//!
//! # Teardown
//!
//! Whoever sets `shutdown` rings the other side once so that a blocked
//! peer notices. A side that observes `shutdown` rings nobody.


mod client;
mod server;

pub use client::Client;
pub use server::Server;

use std::time::Duration;

use ivshmem::DeviceHandle;

use crate::report::Throughput;

/// Outcome of a role that ran to a clean shutdown.
#[derive(Clone, Copy, Debug)]
pub struct Summary {
    /// Rounds completed.
    pub rounds: u64,
    /// Bytes moved through the bulk area.
    pub throughput: Throughput,
}

fn wait_event(device: &DeviceHandle, timeout: Option<Duration>) -> ivshmem::Result<()> {
    match timeout {
        Some(timeout) => device.wait_event_timeout(timeout),
        None => device.wait_event(),
    }
}
