// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! In-process interconnect for host testing.
//!
//! A [`Fabric`] plays the role of the hypervisor: it owns one shared memory
//! region and hands every attached peer a register block and an interrupt
//! line of its own. Writing a doorbell on one port delivers it to the port
//! named in the message:
//!
//! ```text
//! sender.ring(B, cmd)
//!     └─► Port(A).write(Doorbell, B<<16 | cmd)
//!            └─► Port(B).status = cmd      (latched, read-to-clear)
//!                  └─► line(B).raise()     ─► B's dispatcher
//! ```
//!
//! Delivery runs synchronously on the sender's thread. Deliveries to one
//! peer are serialized, so the peer's dispatcher never sees two statuses
//! merged and is never reentered. A masked peer latches the status but is
//! not interrupted. Doorbells for peers that are not attached are dropped.


use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use ivshmem_abi::{DoorbellMessage, PeerId, Register};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::device::{Device, DeviceResources};
use crate::error::Result;
use crate::irq::{IrqLine, IrqReturn};
use crate::platform::RegisterBlock;
use crate::window::SharedWindow;

/// Receiving side of one attached peer.
struct PortState {
    peer: PeerId,
    mask: AtomicU32,
    status: AtomicU32,
    line: Arc<IrqLine>,
    /// Held for the whole latch-and-raise sequence.
    delivery: Mutex<()>,
}

impl PortState {
    fn deliver(&self, status: u32, force: bool) -> IrqReturn {
        let _guard = self.delivery.lock();
        self.status.store(status, Ordering::SeqCst);
        if !force && self.mask.load(Ordering::SeqCst) == 0 {
            trace!(peer = %self.peer, status, "delivery latched while masked");
            return IrqReturn::None;
        }
        self.line.raise()
    }
}

struct FabricInner {
    window: SharedWindow,
    ports: Mutex<HashMap<PeerId, Arc<PortState>>>,
    next_irq: AtomicU32,
}

impl FabricInner {
    fn port(&self, peer: PeerId) -> Option<Arc<PortState>> {
        self.ports.lock().get(&peer).cloned()
    }

    fn route(&self, from: PeerId, message: DoorbellMessage) {
        let target = message.destination();
        let Some(port) = self.port(target) else {
            warn!(%from, ?message, "doorbell for unknown peer dropped");
            return;
        };
        trace!(%from, ?message, "doorbell");
        port.deliver(message.status(), false);
    }
}

/// Register block of one port.
struct Port {
    state: Arc<PortState>,
    fabric: Weak<FabricInner>,
}

impl RegisterBlock for Port {
    fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::IntrMask => self.state.mask.load(Ordering::SeqCst),
            Register::IntrStatus => self.state.status.swap(0, Ordering::SeqCst),
            Register::IvPosition => self.state.peer.as_u32(),
            Register::Doorbell => 0,
        }
    }

    fn write(&self, reg: Register, value: u32) {
        match reg {
            Register::IntrMask => self.state.mask.store(value, Ordering::SeqCst),
            Register::Doorbell => {
                if let Some(fabric) = self.fabric.upgrade() {
                    fabric.route(self.state.peer, DoorbellMessage::from_raw(value));
                }
            }
            Register::IntrStatus | Register::IvPosition => {}
        }
    }
}

/// Shared region plus doorbell routing between in-process peers.
///
/// Cloning yields another handle to the same interconnect.
#[derive(Clone)]
pub struct Fabric {
    inner: Arc<FabricInner>,
}

impl Fabric {
    /// An interconnect with a zeroed shared window of `window_size` bytes.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            inner: Arc::new(FabricInner {
                window: SharedWindow::heap(window_size),
                ports: Mutex::new(HashMap::new()),
                next_irq: AtomicU32::new(32),
            }),
        }
    }

    /// The shared window, as every peer sees it.
    #[must_use]
    pub fn window(&self) -> &SharedWindow {
        &self.inner.window
    }

    /// Size of the shared window in bytes.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.inner.window.len()
    }

    /// Create the port for `peer` and return what a driver needs to attach.
    ///
    /// A port already registered for `peer` is replaced.
    #[must_use]
    pub fn resources(&self, peer: PeerId) -> (DeviceResources, Arc<IrqLine>) {
        let line = IrqLine::new(self.inner.next_irq.fetch_add(1, Ordering::Relaxed));
        let state = Arc::new(PortState {
            peer,
            mask: AtomicU32::new(0),
            status: AtomicU32::new(0),
            line: Arc::clone(&line),
            delivery: Mutex::new(()),
        });
        if self.inner.ports.lock().insert(peer, Arc::clone(&state)).is_some() {
            warn!(%peer, "replacing existing port");
        }
        debug!(%peer, irq = line.number(), "port created");

        let registers: Arc<dyn RegisterBlock> = Arc::new(Port {
            state,
            fabric: Arc::downgrade(&self.inner),
        });
        let resources = DeviceResources {
            registers: Some(registers),
            window: Some(self.inner.window.clone()),
        };
        (resources, line)
    }

    /// Create a port for `peer` and attach a device to it.
    ///
    /// # Errors
    ///
    /// Whatever [`Device::attach`] returns.
    pub fn attach(&self, peer: PeerId) -> Result<Device> {
        let (resources, line) = self.resources(peer);
        Device::attach(resources, &line)
    }

    /// Remove the port of `peer`; later doorbells to it are dropped.
    ///
    /// Returns false if no such port exists.
    pub fn remove(&self, peer: PeerId) -> bool {
        let removed = self.inner.ports.lock().remove(&peer).is_some();
        if removed {
            debug!(%peer, "port removed");
        }
        removed
    }

    /// Attached peers, in ascending order.
    #[must_use]
    pub fn peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<_> = self.inner.ports.lock().keys().copied().collect();
        peers.sort_unstable();
        peers
    }

    /// Latch a raw `status` on `peer` and raise its line, ignoring the mask.
    ///
    /// Used to inject values no doorbell can produce, such as all-ones.
    /// Returns the dispatcher's verdict, `None` for an unknown peer.
    pub fn raise(&self, peer: PeerId, status: u32) -> IrqReturn {
        self.inner
            .port(peer)
            .map_or(IrqReturn::None, |port| port.deliver(status, true))
    }
}

impl core::fmt::Debug for Fabric {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fabric")
            .field("window", &self.inner.window)
            .field("peers", &self.peers())
            .finish()
    }
}
