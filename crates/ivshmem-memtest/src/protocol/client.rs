// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Client role: seed rounds and verify the result.

use std::sync::Arc;

use ivshmem::{Command, DeviceHandle, PeerId};
use ivshmem_abi::layout::{ControlField, START};
use rand::Rng;
use tracing::{debug, error, info, warn};

use super::{Summary, wait_event};
use crate::bulk::verify_pass;
use crate::config::HandshakeConfig;
use crate::error::{HandshakeError, Result};
use crate::report::Throughput;
use crate::session::ControlSession;

/// The initiating side of the handshake.
#[derive(Debug)]
pub struct Client {
    device: Arc<DeviceHandle>,
    session: ControlSession,
    config: HandshakeConfig,
    server: Option<PeerId>,
    rounds: u64,
    throughput: Throughput,
}

impl Client {
    /// Prepare the client role on `device`.
    ///
    /// # Errors
    ///
    /// Device errors from mapping the window, or
    /// [`HandshakeError::WindowTooSmall`].
    pub fn new(device: Arc<DeviceHandle>, config: HandshakeConfig) -> Result<Self> {
        let session = ControlSession::new(device.map()?)?;
        Ok(Self {
            device,
            session,
            config,
            server: None,
            rounds: 0,
            throughput: Throughput::start(),
        })
    }

    /// The control record this client works on.
    #[must_use]
    pub const fn session(&self) -> &ControlSession {
        &self.session
    }

    /// Rounds verified so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Publish the client and wait for the server's readiness doorbell.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::Shutdown`] if the session was torn down meanwhile,
    /// device errors otherwise.
    pub fn connect(&mut self) -> Result<PeerId> {
        let peer = self.device.peer_id()?;
        self.session.publish_client(peer);
        info!(%peer, "client waiting for server");
        if self.session.is_ready() {
            if let Some(server) = self.session.server() {
                debug!(%server, "server already up, saying hello");
                self.device.ring(server, Command::WaitEventIrq)?;
            }
        }
        let server = loop {
            wait_event(&self.device, self.config.timeout)?;
            if self.session.is_shutdown() {
                return Err(HandshakeError::Shutdown);
            }
            if !self.session.is_ready() {
                continue;
            }
            if let Some(server) = self.session.server() {
                break server;
            }
        };
        info!(%server, "server ready");
        self.server = Some(server);
        Ok(server)
    }

    /// Run one round seeded with `seed`, connecting first if needed.
    ///
    /// On a mismatch the session is shut down before the error returns; the
    /// mismatch is reported even if the server can no longer be rung.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::VerificationMismatch`] for the first bad slot,
    /// [`HandshakeError::Shutdown`] if the server side went away, device
    /// errors otherwise.
    pub fn round(&mut self, seed: u32) -> Result<()> {
        let server = match self.server {
            Some(server) => server,
            None => self.connect()?,
        };
        if self.session.is_shutdown() {
            return Err(HandshakeError::Shutdown);
        }
        self.session.set(ControlField::Done, 0);
        self.session.set(ControlField::Data, seed);
        self.session.set(ControlField::Start, START);
        debug!(round = self.rounds, seed, "starting server");
        self.device.ring(server, Command::WaitEventIrq)?;

        loop {
            wait_event(&self.device, self.config.timeout)?;
            if self.session.is_shutdown() {
                return Err(HandshakeError::Shutdown);
            }
            if self.session.is_done() {
                break;
            }
        }
        self.session.set(ControlField::Done, 0);

        for _ in 0..self.config.passes {
            match verify_pass(&self.session, seed) {
                Ok(read) => self.throughput.record_reads(read),
                Err(err) => {
                    error!(round = self.rounds, %err, "memtest failed");
                    return Err(self.abort(err));
                }
            }
        }
        info!(round = self.rounds, throughput = %self.throughput, "client round verified");
        self.rounds += 1;
        Ok(())
    }

    /// Tear the session down and wake the server one last time.
    ///
    /// # Errors
    ///
    /// Device errors from the final doorbell.
    pub fn shutdown(&self) -> Result<()> {
        self.session.request_shutdown();
        if let Some(server) = self.server {
            self.device.ring(server, Command::WaitEventIrq)?;
        }
        Ok(())
    }

    /// Shut the session down after `err` and hand `err` back.
    ///
    /// A failing final doorbell is logged; it never replaces `err`.
    pub(crate) fn abort(&self, err: HandshakeError) -> HandshakeError {
        if let Err(ring_err) = self.shutdown() {
            warn!(%ring_err, "could not wake the server for teardown");
        }
        err
    }

    /// Connect, then run rounds with seeds drawn from `rng` until the round
    /// limit, and shut the session down.
    ///
    /// # Errors
    ///
    /// As [`connect`](Self::connect) and [`round`](Self::round).
    pub fn run<R: Rng>(mut self, rng: &mut R) -> Result<Summary> {
        self.connect()?;
        while !self.config.rounds.is_some_and(|limit| self.rounds >= limit) {
            self.round(rng.r#gen())?;
        }
        info!(rounds = self.rounds, "client shutting down");
        self.shutdown()?;
        Ok(Summary {
            rounds: self.rounds,
            throughput: self.throughput,
        })
    }
}
