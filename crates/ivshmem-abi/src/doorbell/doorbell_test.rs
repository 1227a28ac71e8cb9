// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for doorbell messages and status classification.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use proptest::prelude::*;

#[test]
fn message_layout() {
    let msg = DoorbellMessage::new(PeerId::new(3), Command::WaitEventIrq);
    assert_eq!(msg.raw(), 0x0003_0004);
    assert_eq!(msg.destination(), PeerId::new(3));
    assert_eq!(msg.code(), 4);
    assert_eq!(msg.command(), Some(Command::WaitEventIrq));
    assert_eq!(msg.status(), 4);
}

#[test]
fn message_highest_peer() {
    let msg = DoorbellMessage::new(PeerId::new(u16::MAX), Command::SemaIrq);
    assert_eq!(msg.raw(), 0xFFFF_0007);
    assert_eq!(msg.destination(), PeerId::new(u16::MAX));
    assert_eq!(msg.status(), 7);
}

#[test]
fn message_from_raw_with_foreign_code() {
    let msg = DoorbellMessage::from_raw(0x0001_0042);
    assert_eq!(msg.destination(), PeerId::new(1));
    assert_eq!(msg.code(), 0x42);
    assert!(msg.command().is_none());
}

#[test]
fn empty_and_sema_irq_keep_distinct_codes() {
    let empty = DoorbellMessage::new(PeerId::new(1), Command::Empty);
    let sema = DoorbellMessage::new(PeerId::new(1), Command::SemaIrq);
    assert_ne!(empty.raw(), sema.raw());
    assert_eq!(empty.code(), 2);
    assert_eq!(sema.code(), 7);
}

#[test]
fn classify_spurious() {
    assert_eq!(StatusEvent::classify(0), StatusEvent::Spurious);
    assert_eq!(StatusEvent::classify(0xFFFF_FFFF), StatusEvent::Spurious);
    assert!(!StatusEvent::classify(0).is_handled());
}

#[test]
fn classify_channels() {
    assert_eq!(StatusEvent::classify(7), StatusEvent::Semaphore);
    assert_eq!(StatusEvent::classify(4), StatusEvent::Event);
    assert!(StatusEvent::classify(7).is_handled());
}

#[test]
fn classify_uses_code_byte_only() {
    assert_eq!(StatusEvent::classify(0x0100 | 7), StatusEvent::Semaphore);
    assert_eq!(StatusEvent::classify(0x0200 | 4), StatusEvent::Event);
}

#[test]
fn classify_unrecognized() {
    for cmd in Command::ALL {
        if cmd.signals_semaphore() || cmd.signals_event() || cmd.code() == 0 {
            continue;
        }
        let status = u32::from(cmd.code());
        assert_eq!(
            StatusEvent::classify(status),
            StatusEvent::Unrecognized(status)
        );
    }
    assert_eq!(
        StatusEvent::classify(0x99),
        StatusEvent::Unrecognized(0x99)
    );
    assert!(StatusEvent::classify(0x99).is_handled());
}

#[test]
fn command_round_trip() {
    for cmd in Command::ALL {
        assert_eq!(Command::from_u8(cmd.code()), Some(cmd));
        assert_eq!(Command::from_u32(u32::from(cmd.code())), Some(cmd));
    }
    assert!(Command::from_u8(8).is_none());
    assert!(Command::from_u32(0x107).is_none());
}

#[test]
fn ring_commands() {
    let rings: [Command; 3] = [Command::Empty, Command::WaitEventIrq, Command::SemaIrq];
    for cmd in Command::ALL {
        assert_eq!(cmd.is_ring(), rings.contains(&cmd));
    }
}

proptest! {
    #[test]
    fn message_fields_survive_encoding(peer in any::<u16>(), index in 0usize..8) {
        let cmd = Command::ALL[index];
        let msg = DoorbellMessage::new(PeerId::new(peer), cmd);
        prop_assert_eq!(msg.raw(), (u32::from(peer) << 16) | u32::from(cmd.code()));
        prop_assert_eq!(msg.destination(), PeerId::new(peer));
        prop_assert_eq!(msg.command(), Some(cmd));
        prop_assert_eq!(msg.status(), u32::from(cmd.code()));
        prop_assert_eq!(DoorbellMessage::from_raw(msg.raw()), msg);
    }

    #[test]
    fn ring_reaches_channel_of_its_command(peer in 1u16..=u16::MAX, index in 0usize..8) {
        let cmd = Command::ALL[index];
        let event = StatusEvent::classify(DoorbellMessage::new(PeerId::new(peer), cmd).raw());
        prop_assert!(event.is_handled());
        prop_assert_eq!(event == StatusEvent::Semaphore, cmd.signals_semaphore());
        prop_assert_eq!(event == StatusEvent::Event, cmd.signals_event());
    }
}
