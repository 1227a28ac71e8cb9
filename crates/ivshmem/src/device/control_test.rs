// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the control plane.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ivshmem_abi::{Command, DoorbellMessage, PeerId};

use crate::device::{Device, DeviceResources, Request, Response};
use crate::error::Error;
use crate::irq::IrqLine;
use crate::platform::MockRegisters;

const SHORT: Duration = Duration::from_millis(20);

fn attach(position: u16) -> (Device, Arc<MockRegisters>, Arc<IrqLine>) {
    let regs = Arc::new(MockRegisters::with_position(PeerId::new(position)));
    let line = IrqLine::new(3);
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

fn deliver(regs: &MockRegisters, line: &IrqLine, command: Command) {
    regs.set_status(DoorbellMessage::new(PeerId::new(0), command).status());
    line.raise();
}

#[test]
fn ring_writes_doorbell_message() {
    let (device, regs, _line) = attach(0);
    device.ring(PeerId::new(2), Command::SemaIrq).unwrap();
    device.ring(PeerId::new(0xFFFF), Command::WaitEventIrq).unwrap();

    let doorbells: Vec<u32> = regs.take_doorbells().into_iter().map(DoorbellMessage::raw).collect();
    assert_eq!(doorbells, vec![0x0002_0007, 0xFFFF_0004]);
}

#[test]
fn peer_id_reads_position_register() {
    let (device, _regs, _line) = attach(5);
    assert_eq!(device.peer_id().unwrap(), PeerId::new(5));
}

#[test]
fn arm_then_down() {
    let (device, _regs, _line) = attach(0);
    device.arm(1);
    device.down().unwrap();
    assert_eq!(device.down_timeout(SHORT), Err(Error::TimedOut));
}

#[test]
fn two_deliveries_allow_two_downs_and_third_blocks() {
    let (device, regs, line) = attach(0);
    deliver(&regs, &line, Command::SemaIrq);
    deliver(&regs, &line, Command::SemaIrq);

    device.down().unwrap();
    device.down().unwrap();
    assert_eq!(device.down_timeout(SHORT), Err(Error::TimedOut));
}

#[test]
fn down_completes_once_per_delivery() {
    let (device, regs, line) = attach(0);
    let handle = device.handle().clone();
    let waiter = thread::spawn(move || {
        for _ in 0..8 {
            handle.down().unwrap();
        }
    });
    for _ in 0..8 {
        deliver(&regs, &line, Command::SemaIrq);
    }
    waiter.join().unwrap();
    assert_eq!(device.pending().semaphore, 0);
}

#[test]
fn wait_event_after_delivery_does_not_block() {
    let (device, regs, line) = attach(0);
    deliver(&regs, &line, Command::WaitEventIrq);
    device.wait_event_timeout(SHORT).unwrap();
    assert!(!device.pending().event);
}

#[test]
fn wait_event_wakes_on_delivery() {
    let (device, regs, line) = attach(0);
    let handle = device.handle().clone();
    let waiter = thread::spawn(move || handle.wait_event());
    thread::sleep(SHORT);
    deliver(&regs, &line, Command::WaitEventIrq);
    assert_eq!(waiter.join().unwrap(), Ok(()));
}

#[test]
fn interrupted_down_leaves_count_untouched() {
    let (device, _regs, _line) = attach(0);
    let handle = device.handle().clone();
    let waiter = thread::spawn(move || handle.down());
    device.interrupt_waiters();
    assert_eq!(waiter.join().unwrap(), Err(Error::Interrupted));
    assert_eq!(device.pending().semaphore, 0);

    device.arm(1);
    device.down().unwrap();
}

#[test]
fn decode_covers_command_space() {
    assert_eq!(Request::decode(0, 3).unwrap(), Request::SetSema(3));
    assert_eq!(Request::decode(1, 0).unwrap(), Request::DownSema);
    assert_eq!(Request::decode(2, 4).unwrap(), Request::Empty(PeerId::new(4)));
    assert_eq!(Request::decode(3, 0).unwrap(), Request::WaitEvent);
    assert_eq!(Request::decode(4, 1).unwrap(), Request::WaitEventIrq(PeerId::new(1)));
    assert_eq!(Request::decode(5, 0).unwrap(), Request::ReadIvPosn);
    assert_eq!(Request::decode(6, 0).unwrap(), Request::ReadLivelist);
    assert_eq!(Request::decode(7, 2).unwrap(), Request::SemaIrq(PeerId::new(2)));
    assert_eq!(Request::decode(8, 0), Err(Error::UnsupportedCommand(8)));
}

#[test]
fn decode_takes_target_from_low_bits() {
    assert_eq!(
        Request::decode(7, 0x0001_0003).unwrap(),
        Request::SemaIrq(PeerId::new(3))
    );
}

#[test]
fn control_dispatches_requests() {
    let (device, _regs, _line) = attach(6);
    assert_eq!(device.control(Request::SetSema(1)).unwrap(), Response::Done);
    assert_eq!(device.control(Request::DownSema).unwrap(), Response::Done);
    assert_eq!(
        device.control(Request::ReadIvPosn).unwrap(),
        Response::PeerId(PeerId::new(6))
    );
    assert_eq!(
        device.control(Request::ReadLivelist),
        Err(Error::UnsupportedCommand(6))
    );
}

#[test]
fn empty_and_sema_irq_share_ring_path() {
    let (device, regs, _line) = attach(0);
    device.control(Request::Empty(PeerId::new(1))).unwrap();
    device.control(Request::SemaIrq(PeerId::new(1))).unwrap();
    device.control(Request::WaitEventIrq(PeerId::new(1))).unwrap();

    let commands: Vec<_> = regs
        .take_doorbells()
        .iter()
        .map(|m| (m.destination(), m.command()))
        .collect();
    assert_eq!(
        commands,
        vec![
            (PeerId::new(1), Some(Command::Empty)),
            (PeerId::new(1), Some(Command::SemaIrq)),
            (PeerId::new(1), Some(Command::WaitEventIrq)),
        ]
    );
}
