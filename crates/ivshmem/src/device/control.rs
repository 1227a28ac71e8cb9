// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Control plane: arm, wait, ring and identity.
//!
//! Operations that block (`down`, `wait_event`) are the only suspension
//! points of the driver. Both can be cancelled through
//! [`DeviceHandle::interrupt_waiters`] and both have a bounded variant;
//! the bounded variants are an extension over the classic device, which
//! only ever blocks indefinitely.

use std::time::Duration;

use ivshmem_abi::{Command, DoorbellMessage, PeerId, Register};
use tracing::{debug, trace};

use super::{DeviceHandle, Pending};
use crate::error::{Error, Result};
use crate::wait::deadline_after;

/// A control-plane request in the numeric command space of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Overwrite the semaphore count.
    SetSema(u32),
    /// Block on the semaphore.
    DownSema,
    /// Ring the target with the `empty` code.
    Empty(PeerId),
    /// Block on the event flag.
    WaitEvent,
    /// Ring the target's event channel.
    WaitEventIrq(PeerId),
    /// Report the own peer id.
    ReadIvPosn,
    /// Report the live peers. Reserved, never implemented by the device.
    ReadLivelist,
    /// Ring the target's semaphore channel.
    SemaIrq(PeerId),
}

impl Request {
    /// Decode a raw command number and its argument.
    ///
    /// Ring commands take the target peer in the low 16 bits of `arg`;
    /// `SetSema` takes the count in the low 32 bits.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedCommand`] for numbers outside the enumeration.
    pub fn decode(cmd: u32, arg: u64) -> Result<Self> {
        let command = Command::from_u32(cmd).ok_or(Error::UnsupportedCommand(cmd))?;
        let target = PeerId::new(arg as u16);
        Ok(match command {
            Command::SetSema => Self::SetSema(arg as u32),
            Command::DownSema => Self::DownSema,
            Command::Empty => Self::Empty(target),
            Command::WaitEvent => Self::WaitEvent,
            Command::WaitEventIrq => Self::WaitEventIrq(target),
            Command::ReadIvPosn => Self::ReadIvPosn,
            Command::ReadLivelist => Self::ReadLivelist,
            Command::SemaIrq => Self::SemaIrq(target),
        })
    }

    /// The command this request corresponds to.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::SetSema(_) => Command::SetSema,
            Self::DownSema => Command::DownSema,
            Self::Empty(_) => Command::Empty,
            Self::WaitEvent => Command::WaitEvent,
            Self::WaitEventIrq(_) => Command::WaitEventIrq,
            Self::ReadIvPosn => Command::ReadIvPosn,
            Self::ReadLivelist => Command::ReadLivelist,
            Self::SemaIrq(_) => Command::SemaIrq,
        }
    }
}

/// Result of a successful control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    /// The request completed without output.
    Done,
    /// The own peer id.
    PeerId(PeerId),
}

impl DeviceHandle {
    /// Overwrite the semaphore count.
    ///
    /// Must not be called while another thread is blocked in `down`.
    pub fn arm(&self, count: u32) {
        debug!(count, "arm semaphore");
        self.semaphore.arm(count);
    }

    /// Block until the semaphore is non-zero, then decrement it.
    ///
    /// # Errors
    ///
    /// [`Error::Interrupted`] if cancelled, [`Error::DeviceUnavailable`]
    /// once detached. Neither consumes a unit.
    pub fn down(&self) -> Result<()> {
        self.ensure_enabled()?;
        trace!("down");
        self.semaphore.down(None).map_err(Error::from)
    }

    /// Like [`down`](Self::down), giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// As `down`, plus [`Error::TimedOut`].
    pub fn down_timeout(&self, timeout: Duration) -> Result<()> {
        self.ensure_enabled()?;
        self.semaphore.down(deadline_after(timeout)).map_err(Error::from)
    }

    /// Block until the event flag is set, then clear it.
    ///
    /// Returns at once if the flag was set before the call.
    ///
    /// # Errors
    ///
    /// As [`down`](Self::down).
    pub fn wait_event(&self) -> Result<()> {
        self.ensure_enabled()?;
        trace!("wait event");
        self.event.wait(None).map_err(Error::from)
    }

    /// Like [`wait_event`](Self::wait_event), giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// As `wait_event`, plus [`Error::TimedOut`].
    pub fn wait_event_timeout(&self, timeout: Duration) -> Result<()> {
        self.ensure_enabled()?;
        self.event.wait(deadline_after(timeout)).map_err(Error::from)
    }

    /// Ring `target`'s doorbell with `command`.
    ///
    /// The target is passed through uninterpreted.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] once detached.
    pub fn ring(&self, target: PeerId, command: Command) -> Result<()> {
        self.ensure_enabled()?;
        let message = DoorbellMessage::new(target, command);
        debug!(?message, "ring");
        self.registers.write(Register::Doorbell, message.raw());
        Ok(())
    }

    /// The own peer id, read from the device on first use.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] once detached.
    pub fn peer_id(&self) -> Result<PeerId> {
        self.ensure_enabled()?;
        Ok(*self
            .peer
            .get_or_init(|| PeerId::from_register(self.registers.read(Register::IvPosition))))
    }

    /// Cancel every wait currently blocked on this device.
    ///
    /// Cancelled waiters fail with [`Error::Interrupted`]; the count and
    /// flag are left as they were. On a channel with nobody blocked, the
    /// cancellation stays pending until the next wait that would block.
    pub fn interrupt_waiters(&self) {
        debug!("interrupt waiters");
        self.semaphore.interrupt();
        self.event.interrupt();
    }

    /// Outstanding signals on both channels.
    #[must_use]
    pub fn pending(&self) -> Pending {
        Pending {
            semaphore: self.semaphore.count(),
            event: self.event.is_set(),
        }
    }

    /// Execute a request from the numeric command space.
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns;
    /// [`Error::UnsupportedCommand`] for `ReadLivelist`.
    pub fn control(&self, request: Request) -> Result<Response> {
        self.ensure_enabled()?;
        match request {
            Request::SetSema(count) => self.arm(count),
            Request::DownSema => self.down()?,
            Request::WaitEvent => self.wait_event()?,
            Request::Empty(target) | Request::WaitEventIrq(target) | Request::SemaIrq(target) => {
                self.ring(target, request.command())?;
            }
            Request::ReadIvPosn => return self.peer_id().map(Response::PeerId),
            Request::ReadLivelist => {
                return Err(Error::UnsupportedCommand(u32::from(Command::ReadLivelist.code())));
            }
        }
        Ok(Response::Done)
    }
}
