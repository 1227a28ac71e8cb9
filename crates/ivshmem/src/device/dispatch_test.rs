// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for interrupt classification and signalling.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use ivshmem_abi::{Command, DoorbellMessage, PeerId};

use crate::device::{Device, DeviceResources, Pending};
use crate::irq::{IrqLine, IrqReturn};
use crate::platform::MockRegisters;

fn attach() -> (Device, Arc<MockRegisters>, Arc<IrqLine>) {
    let regs = Arc::new(MockRegisters::with_position(PeerId::new(1)));
    let line = IrqLine::new(9);
    let device = Device::attach(
        DeviceResources {
            registers: Some(regs.clone()),
            window: None,
        },
        &line,
    )
    .unwrap();
    (device, regs, line)
}

fn status_for(command: Command) -> u32 {
    DoorbellMessage::new(PeerId::new(1), command).status()
}

#[test]
fn all_ones_is_not_handled_and_changes_nothing() {
    let (device, regs, line) = attach();
    regs.set_status(0xFFFF_FFFF);
    assert_eq!(line.raise(), IrqReturn::None);
    assert_eq!(device.pending(), Pending::default());
}

#[test]
fn zero_status_is_not_handled() {
    let (device, regs, line) = attach();
    regs.set_status(0);
    assert_eq!(line.raise(), IrqReturn::None);
    assert!(device.pending().is_idle());
}

#[test]
fn sema_irq_increments_semaphore() {
    let (device, regs, line) = attach();
    regs.set_status(status_for(Command::SemaIrq));
    assert_eq!(line.raise(), IrqReturn::Handled);
    assert_eq!(line.raise(), IrqReturn::Handled);
    assert_eq!(
        device.pending(),
        Pending {
            semaphore: 2,
            event: false
        }
    );
}

#[test]
fn wait_event_irq_sets_event() {
    let (device, regs, line) = attach();
    regs.set_status(status_for(Command::WaitEventIrq));
    assert_eq!(line.raise(), IrqReturn::Handled);
    assert_eq!(
        device.pending(),
        Pending {
            semaphore: 0,
            event: true
        }
    );
}

#[test]
fn channels_are_independent() {
    let (device, regs, line) = attach();
    regs.set_status(status_for(Command::SemaIrq));
    line.raise();
    regs.set_status(status_for(Command::WaitEventIrq));
    line.raise();
    assert_eq!(
        device.pending(),
        Pending {
            semaphore: 1,
            event: true
        }
    );

    device.wait_event().unwrap();
    assert_eq!(device.pending().semaphore, 1);
    device.down().unwrap();
    assert!(device.pending().is_idle());
}

#[test]
fn other_codes_are_handled_but_ignored() {
    let (device, regs, line) = attach();
    for command in [Command::Empty, Command::SetSema, Command::ReadLivelist] {
        let status = status_for(command);
        if status == 0 {
            continue;
        }
        regs.set_status(status);
        assert_eq!(line.raise(), IrqReturn::Handled, "{command}");
    }
    regs.set_status(0x0000_00AB);
    assert_eq!(line.raise(), IrqReturn::Handled);
    assert!(device.pending().is_idle());
}

#[test]
fn detached_device_does_not_dispatch() {
    let (device, regs, line) = attach();
    let handle = device.handle().clone();
    device.detach();

    regs.set_status(status_for(Command::SemaIrq));
    assert_eq!(line.raise(), IrqReturn::None);
    assert_eq!(line.handler_count(), 0);
    assert_eq!(handle.pending().semaphore, 0);
}
