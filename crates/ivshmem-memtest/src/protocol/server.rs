// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Server role: fill the window on request.

use std::sync::Arc;

use ivshmem::{Command, DeviceHandle, PeerId};
use ivshmem_abi::layout::{ControlField, DONE, READY};
use tracing::{debug, info, warn};

use super::{Summary, wait_event};
use crate::bulk::write_pass;
use crate::config::HandshakeConfig;
use crate::error::Result;
use crate::report::Throughput;
use crate::session::ControlSession;

/// The reacting side of the handshake.
#[derive(Debug)]
pub struct Server {
    device: Arc<DeviceHandle>,
    session: ControlSession,
    config: HandshakeConfig,
    ready_sent: bool,
    rounds: u64,
    throughput: Throughput,
}

impl Server {
    /// Prepare the server role on `device`.
    ///
    /// # Errors
    ///
    /// Device errors from mapping the window, or
    /// [`HandshakeError::WindowTooSmall`](crate::HandshakeError::WindowTooSmall).
    pub fn new(device: Arc<DeviceHandle>, config: HandshakeConfig) -> Result<Self> {
        let session = ControlSession::new(device.map()?)?;
        Ok(Self {
            device,
            session,
            config,
            ready_sent: false,
            rounds: 0,
            throughput: Throughput::start(),
        })
    }

    /// The control record this server works on.
    #[must_use]
    pub const fn session(&self) -> &ControlSession {
        &self.session
    }

    /// Rounds served so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Publish the server and announce readiness.
    ///
    /// # Errors
    ///
    /// Device errors.
    pub fn announce(&mut self) -> Result<PeerId> {
        let peer = self.device.peer_id()?;
        self.session.publish_server(peer);
        self.session.set(ControlField::Shutdown, 0);
        self.session.set(ControlField::Ready, READY);
        info!(%peer, slots = self.session.slots(), "server ready");
        self.greet()?;
        Ok(peer)
    }

    /// Send the single readiness doorbell once a client is known.
    fn greet(&mut self) -> Result<()> {
        if self.ready_sent {
            return Ok(());
        }
        if let Some(client) = self.session.client() {
            debug!(%client, "signalling readiness");
            self.device.ring(client, Command::WaitEventIrq)?;
            self.ready_sent = true;
        }
        Ok(())
    }

    /// Wait for one doorbell and act on it.
    ///
    /// Returns false once shutdown was observed.
    ///
    /// # Errors
    ///
    /// Device errors, including a timed-out wait.
    pub fn serve_once(&mut self) -> Result<bool> {
        wait_event(&self.device, self.config.timeout)?;
        if self.session.is_shutdown() {
            return Ok(false);
        }
        if !self.session.is_started() {
            // Hello from a client, or a stray wake-up
            self.greet()?;
            return Ok(true);
        }
        self.ready_sent = true;
        self.session.set(ControlField::Start, 0);
        let seed = self.session.get(ControlField::Data);
        debug!(round = self.rounds, seed, "start received");

        for _ in 0..self.config.passes {
            let written = write_pass(&self.session, seed);
            self.throughput.record_writes(written);
        }
        info!(round = self.rounds, throughput = %self.throughput, "server round done");

        if self.session.is_shutdown() {
            return Ok(false);
        }
        self.session.set(ControlField::Done, DONE);
        match self.session.client() {
            Some(client) => self.device.ring(client, Command::WaitEventIrq)?,
            None => warn!("round finished without a published client"),
        }
        self.rounds += 1;
        Ok(true)
    }

    /// Serve rounds until the client shuts the session down.
    ///
    /// # Errors
    ///
    /// Device errors, including a timed-out wait.
    pub fn run(mut self) -> Result<Summary> {
        self.announce()?;
        while self.serve_once()? {}
        info!(rounds = self.rounds, "server observed shutdown");
        Ok(Summary {
            rounds: self.rounds,
            throughput: self.throughput,
        })
    }
}
